//! The minimal symmetry-action builder (SPEC_FULL.md §6, §10.5). It reads a
//! list of symmetry operations already known to apply to the structure (an
//! `SPGMAT` file) and turns them into the equivalent-site mapping table the
//! core consumes — it does not search for what the operations *are*, which
//! remains genuinely out of scope (§1).
//!
//! The site-correspondence step is a direct, simplified descendant of the
//! teacher's own periodic-coordinate matching
//! (`moyo::search::solve::solve_correspondence`): the same idea (transform a
//! fractional coordinate, find which known site it now coincides with, modulo
//! the lattice), done here as a brute-force scan per operation rather than
//! with a k-d tree, since the sublattice sizes this program targets make that
//! acceleration unnecessary.

use std::fs;
use std::path::Path;

use nalgebra::{Matrix3, Vector3};

use subdisorder::base::{ActionTable, Permutation, SodError};

use crate::error::CliError;
use crate::structure::Structure;

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub rotation: Matrix3<f64>,
    pub translation: Vector3<f64>,
}

/// Parse an SPGMAT file: a operation count on the first line, then for each
/// operation three rows of three integers (the rotation, in the lattice
/// basis) followed by one row of three reals (the fractional translation).
pub fn read_operations(path: impl AsRef<Path>) -> Result<Vec<Operation>, CliError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
    parse_operations(&text).map_err(|msg| CliError::Structure(format!("{}: {}", path.display(), msg)))
}

fn parse_operations(text: &str) -> Result<Vec<Operation>, String> {
    let mut lines = text.lines();
    let count: usize = lines
        .next()
        .ok_or("missing operation count line")?
        .trim()
        .parse()
        .map_err(|_| "operation count is not an integer".to_string())?;

    let mut operations = Vec::with_capacity(count);
    for _ in 0..count {
        let mut rotation_rows = [[0.0f64; 3]; 3];
        for row in &mut rotation_rows {
            let line = lines.next().ok_or("missing rotation row")?;
            *row = parse_three(line)?;
        }
        let translation_line = lines.next().ok_or("missing translation row")?;
        let t = parse_three(translation_line)?;

        #[rustfmt::skip]
        let rotation = Matrix3::new(
            rotation_rows[0][0], rotation_rows[0][1], rotation_rows[0][2],
            rotation_rows[1][0], rotation_rows[1][1], rotation_rows[1][2],
            rotation_rows[2][0], rotation_rows[2][1], rotation_rows[2][2],
        );
        operations.push(Operation {
            rotation,
            translation: Vector3::new(t[0], t[1], t[2]),
        });
    }
    Ok(operations)
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

/// Build the core's [`ActionTable`] over the substitution sites of type
/// `site_index` (0-based) by applying every operation to each site's
/// fractional coordinate and finding which known site it now coincides with,
/// modulo the lattice, within `prec` (a Cartesian-distance tolerance).
pub fn build_action_table(
    structure: &Structure,
    site_index: usize,
    operations: &[Operation],
    prec: f64,
) -> Result<ActionTable, SodError> {
    let range = structure.type_range(site_index);
    let positions: Vec<Vector3<f64>> = structure.positions[range].to_vec();
    let n = positions.len();

    let mut tables = Vec::with_capacity(operations.len());
    for (q, op) in operations.iter().enumerate() {
        let mut mapping = vec![usize::MAX; n];
        for (i, frac) in positions.iter().enumerate() {
            let transformed = wrap_fractional(op.rotation * *frac + op.translation);
            let j = positions
                .iter()
                .position(|candidate| periodic_distance(&structure.lattice, &transformed, candidate) < prec)
                .ok_or(SodError::NotAPermutation { q })?;
            mapping[i] = j;
        }
        tables.push(Permutation::new(mapping));
    }
    ActionTable::new(n, tables)
}

fn wrap_fractional(v: Vector3<f64>) -> Vector3<f64> {
    Vector3::new(wrap_component(v.x), wrap_component(v.y), wrap_component(v.z))
}

fn wrap_component(x: f64) -> f64 {
    let y = x - x.floor();
    if y >= 1.0 {
        0.0
    } else {
        y
    }
}

fn periodic_distance(lattice: &Matrix3<f64>, a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let mut d = a - b;
    for i in 0..3 {
        d[i] -= d[i].round();
    }
    (lattice.transpose() * d).norm()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Matrix3;

    fn simple_structure() -> Structure {
        Structure {
            comment: "two sites".to_string(),
            lattice: Matrix3::identity() * 4.0,
            symbols: vec!["X".to_string()],
            counts: vec![2],
            positions: vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.5, 0.0, 0.0)],
        }
    }

    #[test]
    fn test_identity_operation_maps_to_itself() {
        let structure = simple_structure();
        let identity = Operation {
            rotation: Matrix3::identity(),
            translation: Vector3::zeros(),
        };
        let table = build_action_table(&structure, 0, &[identity], 1e-5).unwrap();
        assert_eq!(table.image(0, 0), 0);
        assert_eq!(table.image(1, 0), 1);
    }

    #[test]
    fn test_translation_swaps_sites() {
        let structure = simple_structure();
        let identity = Operation {
            rotation: Matrix3::identity(),
            translation: Vector3::zeros(),
        };
        let swap = Operation {
            rotation: Matrix3::identity(),
            translation: Vector3::new(0.5, 0.0, 0.0),
        };
        let table = build_action_table(&structure, 0, &[identity, swap], 1e-5).unwrap();
        assert_eq!(table.image(0, 1), 1);
        assert_eq!(table.image(1, 1), 0);
    }

    #[test]
    fn test_parse_operations_roundtrip() {
        let text = "1\n1 0 0\n0 1 0\n0 0 1\n0.5 0 0\n";
        let ops = parse_operations(text).unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].translation, Vector3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_unmatched_site_is_symmetry_integrity_error() {
        let structure = simple_structure();
        let bogus = Operation {
            rotation: Matrix3::identity(),
            translation: Vector3::new(0.1, 0.0, 0.0),
        };
        assert!(build_action_table(&structure, 0, &[bogus], 1e-5).is_err());
    }
}
