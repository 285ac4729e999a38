//! The progress collaborator (SPEC_FULL.md §6, §10.6): a fixed-width bar of
//! '#' for the filled fraction and '-' for the rest, followed by a
//! percentage, terminated with '\r' while incomplete and '\n' once done.

use std::io::{self, Write};

use subdisorder::enumerate::ProgressReporter;

const BAR_WIDTH: usize = 40;

pub struct BarProgress<W: Write> {
    total: u128,
    writer: W,
}

impl BarProgress<io::Stdout> {
    pub fn new() -> Self {
        Self {
            total: 0,
            writer: io::stdout(),
        }
    }
}

impl<W: Write> BarProgress<W> {
    pub fn with_writer(writer: W) -> Self {
        Self { total: 0, writer }
    }
}

impl<W: Write> ProgressReporter for BarProgress<W> {
    fn set_total(&mut self, total: u128) {
        self.total = total;
    }

    fn put(&mut self, current: u128) {
        let total = self.total.max(1);
        let fraction = (current as f64 / total as f64).clamp(0.0, 1.0);
        let filled = ((fraction * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
        let bar: String = std::iter::repeat('#')
            .take(filled)
            .chain(std::iter::repeat('-').take(BAR_WIDTH - filled))
            .collect();
        let percent = (fraction * 100.0).round() as u32;
        let terminator = if current < self.total { '\r' } else { '\n' };
        let _ = write!(self.writer, "[{}] {:3}%{}", bar, percent, terminator);
        let _ = self.writer.flush();
    }
}
