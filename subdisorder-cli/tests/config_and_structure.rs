//! Integration coverage for the INDSOD parser and POSCAR round-tripping
//! (SPEC_FULL.md §10.8), using fixture text written inline rather than
//! external fixture files — the structures this program targets are a
//! handful of atoms.

use nalgebra::{Matrix3, Vector3};
use test_log::test;

use subdisorder_cli::config::Config;
use subdisorder_cli::structure::Structure;

const INDSOD_FIXTURE: &str = "\
nsub = 2
subs = 2, 6
symb = Al, Mg
prec = 1.0e-4
site = 1
leqa = .true.
lcfg = .true.
lpos = .false.
lpro = .false.
";

#[test]
fn test_indsod_fixture_parses_and_validates() {
    let config = Config::parse(INDSOD_FIXTURE).unwrap();
    assert_eq!(config.nsub, 2);
    assert_eq!(config.subs, vec![2, 6]);
    assert_eq!(config.symb, vec!["Al".to_string(), "Mg".to_string()]);
    assert!(config.leqa);
    assert!(!config.lpos);
    assert!(config.validate(&[8]).is_ok());
    assert!(config.validate(&[9]).is_err());
}

#[test]
fn test_sposcar_fixture_roundtrips_through_a_temp_file() {
    let structure = Structure {
        comment: "Al6Mg2 supercell".to_string(),
        lattice: Matrix3::identity() * 8.1,
        symbols: vec!["Al".to_string(), "Mg".to_string()],
        counts: vec![6, 2],
        positions: (0..8)
            .map(|i| Vector3::new(i as f64 / 8.0, 0.0, 0.0))
            .collect(),
    };

    let dir = std::env::temp_dir().join(format!(
        "subdisorder-cli-test-{}-{}",
        std::process::id(),
        "sposcar"
    ));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("SPOSCAR");
    structure.write(&path).unwrap();

    let parsed = Structure::read(&path).unwrap();
    assert_eq!(parsed.symbols, structure.symbols);
    assert_eq!(parsed.counts, structure.counts);
    assert_eq!(parsed.type_range(0), 0..6);
    assert_eq!(parsed.type_range(1), 6..8);
    for (a, b) in parsed.positions.iter().zip(structure.positions.iter()) {
        assert!((a - b).norm() < 1e-10);
    }

    std::fs::remove_dir_all(&dir).ok();
}
