//! The structural collaborator (SPEC_FULL.md §6, §10.5): a reader/writer for
//! the VASP POSCAR/SPOSCAR format. Represented the same way `moyo::base::Cell`
//! and `Lattice` represent a crystal structure — a `nalgebra` lattice matrix
//! plus a flat position list — but keyed by arbitrary species symbols rather
//! than atomic numbers, since this program never needs to resolve a symbol to
//! a periodic-table number.

use std::fs;
use std::path::Path;

use nalgebra::{Matrix3, Vector3};

use crate::error::CliError;

#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    pub comment: String,
    /// Row `i` is the i-th lattice vector.
    pub lattice: Matrix3<f64>,
    /// Type symbols, in the order they appear in the file.
    pub symbols: Vec<String>,
    /// Per-type atom counts, same order as `symbols`.
    pub counts: Vec<usize>,
    /// Fractional coordinates, grouped by type in file order.
    pub positions: Vec<Vector3<f64>>,
}

impl Structure {
    pub fn num_atoms(&self) -> usize {
        self.positions.len()
    }

    pub fn type_counts(&self) -> &[usize] {
        &self.counts
    }

    /// The 0-based site range occupied by type `type_index`.
    pub fn type_range(&self, type_index: usize) -> std::ops::Range<usize> {
        let start: usize = self.counts[..type_index].iter().sum();
        start..start + self.counts[type_index]
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self, CliError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
        Self::parse(&text).map_err(|msg| CliError::Structure(format!("{}: {}", path.display(), msg)))
    }

    fn parse(text: &str) -> Result<Self, String> {
        let mut lines = text.lines();
        let comment = lines.next().ok_or("missing comment line")?.to_string();
        let scale: f64 = lines
            .next()
            .ok_or("missing scale line")?
            .trim()
            .parse()
            .map_err(|_| "scale line is not a number".to_string())?;

        let mut lattice_rows = [[0.0f64; 3]; 3];
        for row in &mut lattice_rows {
            let line = lines.next().ok_or("missing lattice vector line")?;
            *row = parse_three(line)?;
        }
        #[rustfmt::skip]
        let lattice = Matrix3::new(
            lattice_rows[0][0] * scale, lattice_rows[0][1] * scale, lattice_rows[0][2] * scale,
            lattice_rows[1][0] * scale, lattice_rows[1][1] * scale, lattice_rows[1][2] * scale,
            lattice_rows[2][0] * scale, lattice_rows[2][1] * scale, lattice_rows[2][2] * scale,
        );

        let symbols: Vec<String> = lines
            .next()
            .ok_or("missing species line")?
            .split_whitespace()
            .map(|s| s.to_string())
            .collect();
        if symbols.is_empty() {
            return Err("species line is empty".to_string());
        }

        let counts: Vec<usize> = lines
            .next()
            .ok_or("missing per-type count line")?
            .split_whitespace()
            .map(|s| s.parse::<usize>().map_err(|_| "count is not an integer".to_string()))
            .collect::<Result<_, _>>()?;
        if counts.len() != symbols.len() {
            return Err(format!(
                "{} species but {} per-type counts",
                symbols.len(),
                counts.len()
            ));
        }

        let mode = lines.next().ok_or("missing coordinate mode line")?.trim();
        if !mode.to_lowercase().starts_with('d') {
            return Err(format!("unsupported coordinate mode {:?} (only Direct is supported)", mode));
        }

        let n: usize = counts.iter().sum();
        let mut positions = Vec::with_capacity(n);
        for _ in 0..n {
            let line = lines.next().ok_or("missing coordinate line")?;
            let [x, y, z] = parse_three(line)?;
            positions.push(Vector3::new(x, y, z));
        }

        Ok(Self {
            comment,
            lattice,
            symbols,
            counts,
            positions,
        })
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), CliError> {
        let path = path.as_ref();
        let mut out = String::new();
        out.push_str(&self.comment);
        out.push('\n');
        out.push_str("1.0\n");
        for row in self.lattice.row_iter() {
            out.push_str(&format!(
                "{:22.16e} {:22.16e} {:22.16e}\n",
                row[0], row[1], row[2]
            ));
        }
        out.push_str(&self.symbols.join(" "));
        out.push('\n');
        out.push_str(
            &self
                .counts
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(" "),
        );
        out.push('\n');
        out.push_str("Direct\n");
        for p in &self.positions {
            out.push_str(&format!("{:22.16e} {:22.16e} {:22.16e}\n", p.x, p.y, p.z));
        }
        fs::write(path, out).map_err(|e| CliError::io(path, e))
    }
}

fn parse_three(line: &str) -> Result<[f64; 3], String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(format!("expected 3 values, got {:?}", line));
    }
    let mut out = [0.0f64; 3];
    for i in 0..3 {
        out[i] = parts[i].parse().map_err(|_| format!("not a number: {:?}", parts[i]))?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Structure {
        Structure {
            comment: "test cell".to_string(),
            lattice: Matrix3::identity() * 4.0,
            symbols: vec!["Al".to_string(), "Mg".to_string()],
            counts: vec![2, 2],
            positions: vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(0.5, 0.0, 0.0),
                Vector3::new(0.0, 0.5, 0.0),
                Vector3::new(0.0, 0.0, 0.5),
            ],
        }
    }

    #[test]
    fn test_roundtrip_through_text() {
        let original = sample();
        let dir = std::env::temp_dir().join(format!("subdisorder-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("POSCAR");
        original.write(&path).unwrap();
        let parsed = Structure::read(&path).unwrap();
        assert_eq!(parsed.symbols, original.symbols);
        assert_eq!(parsed.counts, original.counts);
        assert_eq!(parsed.num_atoms(), 4);
        for (a, b) in parsed.positions.iter().zip(original.positions.iter()) {
            assert!((a - b).norm() < 1e-12);
        }
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_type_range() {
        let s = sample();
        assert_eq!(s.type_range(0), 0..2);
        assert_eq!(s.type_range(1), 2..4);
    }

    #[test]
    fn test_rejects_cartesian_mode() {
        let text = "c\n1.0\n4 0 0\n0 4 0\n0 0 4\nAl\n1\nCartesian\n0 0 0\n";
        assert!(Structure::parse(text).is_err());
    }
}
