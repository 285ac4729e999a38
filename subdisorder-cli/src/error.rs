use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the CLI, wrapping I/O, configuration, and the core's own
/// [`subdisorder::base::SodError`] with enough file-path context to print a
/// one-line, human-readable message (SPEC_FULL.md §10.3).
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("configuration error: {0}")]
    Config(String),
    #[error("{0}")]
    Structure(String),
    #[error("{0}")]
    Core(#[from] subdisorder::base::SodError),
}

impl CliError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The process exit code for this failure (SPEC_FULL.md §6: "non-zero on
    /// any validation or integrity failure").
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Io { .. } => 1,
            CliError::Config(_) => 2,
            CliError::Structure(_) => 3,
            CliError::Core(_) => 4,
        }
    }
}
