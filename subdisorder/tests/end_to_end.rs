//! The cross-component scenarios and quantified invariants of SPEC_FULL.md
//! §8, run against the public `subdisorder` API end to end (partition +
//! codec + enumerate, wired by [`SodDataset`]), using `use test_log::test;`
//! over plain `#[test]` (see `moyo/tests/test_moyo_dataset.rs`) so a failing
//! case logs its trace.

use std::collections::HashSet;

use test_log::test;

use subdisorder::base::{ActionTable, Composition, Permutation};
use subdisorder::partition::partition;
use subdisorder::SodDataset;

fn all_permutations(n: usize) -> Vec<Vec<usize>> {
    fn permute(prefix: &mut Vec<usize>, remaining: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if remaining.is_empty() {
            out.push(prefix.clone());
            return;
        }
        for i in 0..remaining.len() {
            let value = remaining.remove(i);
            prefix.push(value);
            permute(prefix, remaining, out);
            prefix.pop();
            remaining.insert(i, value);
        }
    }
    let mut out = Vec::new();
    permute(&mut Vec::new(), &mut (0..n).collect(), &mut out);
    out
}

fn dataset(n: usize, ops: Vec<Vec<usize>>, counts: Vec<usize>) -> SodDataset {
    let action = ActionTable::new(n, ops.into_iter().map(Permutation::new).collect()).unwrap();
    SodDataset::new(&action, Composition::new(counts).unwrap()).unwrap()
}

#[test]
fn scenario_1_trivial_group_binary() {
    let data = dataset(4, vec![vec![0, 1, 2, 3]], vec![2, 2]);
    assert!(data.complete);
    assert_eq!(data.num_orbits(), 6);
    assert!(data.representatives.iter().all(|&(_, d)| d == 1));
    let mut ranks: Vec<_> = data.representatives.iter().map(|&(r, _)| r).collect();
    ranks.sort();
    assert_eq!(ranks, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn scenario_2_full_symmetric_group_binary() {
    let data = dataset(4, all_permutations(4), vec![2, 2]);
    assert_eq!(data.num_orbits(), 1);
    assert_eq!(data.representatives[0].1, 6);
}

#[test]
fn scenario_3_cyclic_group_binary() {
    let ops = vec![
        vec![0, 1, 2, 3],
        vec![1, 2, 3, 0],
        vec![2, 3, 0, 1],
        vec![3, 0, 1, 2],
    ];
    let data = dataset(4, ops, vec![2, 2]);
    let mut degeneracies: Vec<_> = data.representatives.iter().map(|&(_, d)| d).collect();
    degeneracies.sort();
    assert_eq!(degeneracies, vec![2, 4]);
    assert_eq!(data.total_degeneracy(), 6);
}

#[test]
fn scenario_4_trivial_group_ternary() {
    let data = dataset(6, vec![(0..6).collect()], vec![2, 2, 2]);
    assert_eq!(data.num_orbits(), 90);
    assert!(data.representatives.iter().all(|&(_, d)| d == 1));
}

#[test]
fn scenario_5_full_symmetric_group_ternary() {
    let data = dataset(6, all_permutations(6), vec![2, 2, 2]);
    assert_eq!(data.num_orbits(), 1);
    assert_eq!(data.representatives[0].1, 90);
}

#[test]
fn scenario_6_mixed_orbit_degeneracy_correction_is_a_no_op() {
    let data = dataset(4, all_permutations(4), vec![2, 2]);
    // A single orbit of size 4 (all 4 sites symmetry-equivalent under S4):
    // the raw orbit collection over A-forms yields 6 members, all one orbit;
    // the correction factor is 1, so the emitted degeneracy stays 6.
    assert_eq!(data.num_orbits(), 1);
    assert_eq!(data.representatives[0].1, 6);
}

#[test]
fn invariant_orbit_membership_and_disjointness_and_sum() {
    let ops = vec![vec![0, 1, 2, 3, 4, 5], vec![1, 0, 3, 2, 5, 4]];
    let data = dataset(6, ops, vec![3, 3]);

    let mut seen = HashSet::new();
    let mut total = 0u128;
    for &(rank, degeneracy) in &data.representatives {
        let aform = data.representative_aform(rank).unwrap();
        let mut members = HashSet::new();
        for q in 0..data.partition.action.num_operations() {
            let transformed = data.partition.action.transform_aform(&aform, q);
            members.insert(data.codec.aform_to_rank(&transformed).unwrap());
        }
        assert_eq!(members.len() as u128, degeneracy);
        assert_eq!(*members.iter().min().unwrap(), rank);
        for member in members {
            assert!(seen.insert(member), "rank {} appeared in two orbits", member);
        }
        total += degeneracy;
    }
    assert_eq!(total, data.codec.n_total());
    assert!(data.degeneracy_sums_to_total());
}

#[test]
fn invariant_orbit_contiguity_after_partitioning() {
    let ops = vec![vec![0, 1, 2, 3], vec![2, 3, 0, 1]];
    let action = ActionTable::new(4, ops.into_iter().map(Permutation::new).collect()).unwrap();
    let result = partition(&action, 1).unwrap();
    for b in 0..result.num_orbits() {
        let (lo, hi) = (result.boundaries[b], result.boundaries[b + 1]);
        for site in lo..hi {
            for q in 0..result.action.num_operations() {
                let image = result.action.image(site, q);
                assert!(image >= lo && image < hi);
            }
        }
    }
}

#[test]
fn invariant_partition_is_stable_under_a_second_application() {
    let ops = vec![vec![0, 1, 2, 3], vec![2, 3, 0, 1]];
    let action = ActionTable::new(4, ops.into_iter().map(Permutation::new).collect()).unwrap();
    let first = partition(&action, 1).unwrap();
    let second = partition(&first.action, 1).unwrap();
    assert!(second.permutation.is_identity());
}
