//! **subdisorder**: symmetry-irreducible enumeration of substitutional
//! configurations over a fixed set of sites (SPEC_FULL.md §1-§5).
//!
//! The pipeline is four components, each its own module:
//!
//! - [`base`] — the symmetry action table, composition, and permutation
//!   primitives shared by everything downstream (Component A's types).
//! - [`math`] (crate-private) — binomial/colex arithmetic and the packed
//!   bitset (Component A).
//! - [`codec`] — the rank <-> A-form bijection (Component B).
//! - [`partition`] — orbit discovery and site relabelling (Component C).
//! - [`enumerate`] — the irreducible enumerator itself (Component D).
//!
//! [`SodDataset::new`] wires all four into the single call most callers want.

pub mod base;
pub mod codec;
pub mod enumerate;
mod math;
pub mod partition;

use base::{ActionTable, Composition, Rank, SodError};
use codec::Codec;
use enumerate::{enumerate, EnumerationOutcome, ProgressReporter, Representative};
use partition::{partition, PartitionResult};

/// The full result of enumerating one composition's symmetry-irreducible
/// configuration space: the relabelled action, the codec it was enumerated
/// against, and the list of canonical `(rank, degeneracy)` representatives.
#[derive(Debug, Clone)]
pub struct SodDataset {
    // ------------------------------------------------------------------------
    // Symmetry
    // ------------------------------------------------------------------------
    pub partition: PartitionResult,
    // ------------------------------------------------------------------------
    // Rank space
    // ------------------------------------------------------------------------
    pub codec: Codec,
    // ------------------------------------------------------------------------
    // Enumeration
    // ------------------------------------------------------------------------
    pub representatives: Vec<Representative>,
    pub complete: bool,
}

impl SodDataset {
    /// Run the full pipeline: partition `action` into orbits, build a codec
    /// for `composition`, and enumerate every irreducible configuration.
    pub fn new(action: &ActionTable, composition: Composition) -> Result<Self, SodError> {
        Self::with_progress(action, composition, None, None)
    }

    /// Like [`SodDataset::new`], but reports progress through `progress` and
    /// checks `cancel` between outer-loop iterations (SPEC_FULL.md §5, §6).
    pub fn with_progress(
        action: &ActionTable,
        composition: Composition,
        progress: Option<&mut dyn ProgressReporter>,
        cancel: Option<&dyn Fn() -> bool>,
    ) -> Result<Self, SodError> {
        let k1 = composition.count(0);
        let n = action.num_sites();
        log::debug!("SodDataset::new: n={}, composition={:?}", n, composition.counts());

        let partition = partition(action, k1)?;
        let codec = Codec::new(n, composition)?;
        let outcome = enumerate(&partition, &codec, progress, cancel)?;

        let (representatives, complete) = match outcome {
            EnumerationOutcome::Completed(reps) => (reps, true),
            EnumerationOutcome::Cancelled(reps) => (reps, false),
        };

        log::debug!(
            "SodDataset::new: found {} orbits out of N={} (complete={})",
            representatives.len(),
            codec.n_total(),
            complete
        );

        Ok(Self {
            partition,
            codec,
            representatives,
            complete,
        })
    }

    pub fn num_orbits(&self) -> usize {
        self.representatives.len()
    }

    pub fn total_degeneracy(&self) -> u128 {
        self.representatives.iter().map(|&(_, d)| d).sum()
    }

    /// The N validating identity of SPEC_FULL.md §8: the degeneracies of every
    /// emitted orbit sum to the total configuration count, provided the walk
    /// completed.
    pub fn degeneracy_sums_to_total(&self) -> bool {
        !self.complete || self.total_degeneracy() == self.codec.n_total()
    }

    pub fn representative_aform(&self, rank: Rank) -> Result<base::AForm, SodError> {
        self.codec.rank_to_aform(rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base::Permutation;

    #[test]
    fn test_end_to_end_identity_group() {
        let action = ActionTable::new(4, vec![Permutation::identity(4)]).unwrap();
        let dataset = SodDataset::new(&action, Composition::new(vec![2, 2]).unwrap()).unwrap();
        assert!(dataset.complete);
        assert_eq!(dataset.num_orbits(), 6);
        assert!(dataset.degeneracy_sums_to_total());
    }

    #[test]
    fn test_end_to_end_full_symmetric_group() {
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

        let ops: Vec<Permutation> = all_permutations(4).into_iter().map(Permutation::new).collect();
        let action = ActionTable::new(4, ops).unwrap();
        let dataset = SodDataset::new(&action, Composition::new(vec![2, 2]).unwrap()).unwrap();
        assert_eq!(dataset.num_orbits(), 1);
        assert_eq!(dataset.representatives[0].1, 6);
        assert!(dataset.degeneracy_sums_to_total());
    }

    #[test]
    fn test_representative_aform_roundtrips() {
        let action = ActionTable::new(4, vec![Permutation::identity(4)]).unwrap();
        let dataset = SodDataset::new(&action, Composition::new(vec![2, 2]).unwrap()).unwrap();
        for &(rank, _) in &dataset.representatives {
            let aform = dataset.representative_aform(rank).unwrap();
            assert_eq!(aform.len(), 4);
        }
    }
}
