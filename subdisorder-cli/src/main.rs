//! The `subdisorder` binary: reads `INDSOD` and `SPOSCAR` from the working
//! directory, builds the symmetry action table from `SPGMAT`, runs the core
//! enumerator, and writes whichever outputs the configuration requests
//! (SPEC_FULL.md §6, §10.7).

use std::process::ExitCode;

use nalgebra::Vector3;

use subdisorder::base::{apply_permutation, Composition};
use subdisorder::enumerate::NullProgress;
use subdisorder::SodDataset;

use subdisorder_cli::config::Config;
use subdisorder_cli::error::CliError;
use subdisorder_cli::progress::BarProgress;
use subdisorder_cli::structure::Structure;
use subdisorder_cli::symmetry;

const INDSOD_PATH: &str = "INDSOD";
const SPOSCAR_PATH: &str = "SPOSCAR";
const SPGMAT_PATH: &str = "SPGMAT";

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("subdisorder: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn run() -> Result<(), CliError> {
    let config_text =
        std::fs::read_to_string(INDSOD_PATH).map_err(|e| CliError::io(INDSOD_PATH, e))?;
    let config = Config::parse(&config_text)?;

    let structure = Structure::read(SPOSCAR_PATH)?;
    config.validate(structure.type_counts())?;
    let site_index = config.site - 1;

    let operations = symmetry::read_operations(SPGMAT_PATH)?;
    let action = symmetry::build_action_table(&structure, site_index, &operations, config.prec)?;

    let composition = Composition::new(config.subs.clone())?;

    log::info!(
        "enumerating n={} species={:?} operations={}",
        action.num_sites(),
        config.symb,
        action.num_operations()
    );

    let dataset = if config.lpro {
        let mut bar = BarProgress::new();
        SodDataset::with_progress(&action, composition, Some(&mut bar), None)?
    } else {
        let mut silent = NullProgress;
        SodDataset::with_progress(&action, composition, Some(&mut silent), None)?
    };

    log::info!(
        "found {} orbits out of N={} (complete={})",
        dataset.num_orbits(),
        dataset.codec.n_total(),
        dataset.complete
    );

    if config.leqa {
        write_action_table(&dataset, "EQAMAT")?;
    }
    if config.lspg {
        write_operations_echo(&operations, "SPGMAT.out")?;
    }
    if config.lcfg {
        write_confgl(&dataset, &config, "CONFGL")?;
        write_confgd(&dataset, "CONFGD")?;
    }
    if config.lpos {
        write_per_orbit_poscar(&dataset, &structure, &config, site_index)?;
    }

    Ok(())
}

fn write_action_table(dataset: &SodDataset, path: &str) -> Result<(), CliError> {
    let action = &dataset.partition.action;
    let mut out = String::new();
    for i in 0..action.num_sites() {
        let row: Vec<String> = (0..action.num_operations())
            .map(|q| (action.image(i, q) + 1).to_string())
            .collect();
        out.push_str(&row.join(" "));
        out.push('\n');
    }
    std::fs::write(path, out).map_err(|e| CliError::io(path, e))
}

fn write_operations_echo(operations: &[symmetry::Operation], path: &str) -> Result<(), CliError> {
    let mut out = format!("{}\n", operations.len());
    for op in operations {
        for row in op.rotation.row_iter() {
            out.push_str(&format!("{} {} {}\n", row[0], row[1], row[2]));
        }
        out.push_str(&format!(
            "{} {} {}\n",
            op.translation.x, op.translation.y, op.translation.z
        ));
    }
    std::fs::write(path, out).map_err(|e| CliError::io(path, e))
}

fn write_confgl(dataset: &SodDataset, config: &Config, path: &str) -> Result<(), CliError> {
    let mut out = String::new();
    for &(rank, _) in &dataset.representatives {
        let aform = dataset.representative_aform(rank)?;
        let line: Vec<&str> = aform.iter().map(|&s| config.symb[s].as_str()).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    std::fs::write(path, out).map_err(|e| CliError::io(path, e))
}

fn write_confgd(dataset: &SodDataset, path: &str) -> Result<(), CliError> {
    let mut out = String::new();
    for &(_, degeneracy) in &dataset.representatives {
        out.push_str(&degeneracy.to_string());
        out.push('\n');
    }
    std::fs::write(path, out).map_err(|e| CliError::io(path, e))
}

fn write_per_orbit_poscar(
    dataset: &SodDataset,
    structure: &Structure,
    config: &Config,
    site_index: usize,
) -> Result<(), CliError> {
    let range = structure.type_range(site_index);
    // aform is indexed in the enumerator's relabelled site order, not the
    // SPOSCAR file order, so the sublattice positions must be rewritten under
    // the same permutation before they can be paired with it (SPEC_FULL §4.3).
    let positions_by_label = apply_permutation(&dataset.partition.permutation, &structure.positions[range]);
    for (idx, &(rank, degeneracy)) in dataset.representatives.iter().enumerate() {
        let aform = dataset.representative_aform(rank)?;
        let mut grouped: Vec<Vec<Vector3<f64>>> = vec![Vec::new(); config.symb.len()];
        for (local_i, &species) in aform.iter().enumerate() {
            grouped[species].push(positions_by_label[local_i]);
        }

        let mut symbols = Vec::new();
        let mut counts = Vec::new();
        let mut positions = Vec::new();
        for (t, symbol) in structure.symbols.iter().enumerate() {
            if t == site_index {
                for (species, group) in grouped.iter().enumerate() {
                    if !group.is_empty() {
                        symbols.push(config.symb[species].clone());
                        counts.push(group.len());
                        positions.extend(group.iter().copied());
                    }
                }
            } else {
                let other_range = structure.type_range(t);
                symbols.push(symbol.clone());
                counts.push(structure.counts[t]);
                positions.extend(structure.positions[other_range].iter().copied());
            }
        }

        let orbit_structure = Structure {
            comment: format!("{} orbit {} degeneracy {}", structure.comment, idx, degeneracy),
            lattice: structure.lattice,
            symbols,
            counts,
            positions,
        };
        orbit_structure.write(format!("POSCAR.{:04}", idx))?;
    }
    Ok(())
}
