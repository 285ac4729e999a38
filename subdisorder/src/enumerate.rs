//! Component D: the irreducible enumerator (§4.4).
//!
//! Parallelizing the outer walk across shards, each with its own `occ` slice and
//! a final min-rank merge across shards, is the natural extension of the
//! resource model in §5; it is not implemented here, only documented, since
//! the sequential walk below is already a complete, correct implementation of
//! the contract.

use std::collections::HashMap;
use std::collections::HashSet;

use crate::base::{AForm, Rank, SodError};
use crate::codec::Codec;
use crate::math::{colex_unrank, Bitset};
use crate::partition::PartitionResult;

/// The progress collaborator's contract (§6): `set_total` once, then `put` after
/// every outer-loop iteration.
pub trait ProgressReporter {
    fn set_total(&mut self, total: u128);
    fn put(&mut self, current: u128);
}

/// A progress reporter that does nothing, for callers that do not want one.
pub struct NullProgress;

impl ProgressReporter for NullProgress {
    fn set_total(&mut self, _total: u128) {}
    fn put(&mut self, _current: u128) {}
}

/// One emitted orbit: its canonical (minimum-rank) representative and its
/// degeneracy (orbit size).
pub type Representative = (Rank, u128);

/// The outcome of a call to [`enumerate`]: either every orbit was found, or the
/// walk was cancelled partway through and the result is incomplete (§5).
#[derive(Debug, Clone)]
pub enum EnumerationOutcome {
    Completed(Vec<Representative>),
    Cancelled(Vec<Representative>),
}

impl EnumerationOutcome {
    pub fn representatives(&self) -> &[Representative] {
        match self {
            EnumerationOutcome::Completed(v) | EnumerationOutcome::Cancelled(v) => v,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, EnumerationOutcome::Completed(_))
    }
}

/// Enumerate canonical representatives of every configuration orbit (§4.4).
///
/// `partition` is the output of [`crate::partition::partition`] (its `action`
/// must already be in the orbit-contiguous labeling); `codec` must have been
/// built for the same composition and site count. `cancel`, if given, is
/// checked between outer iterations (§5).
pub fn enumerate(
    partition: &PartitionResult,
    codec: &Codec,
    mut progress: Option<&mut dyn ProgressReporter>,
    cancel: Option<&dyn Fn() -> bool>,
) -> Result<EnumerationOutcome, SodError> {
    validate_roundtrip(codec)?;

    let action = &partition.action;
    let n = action.num_sites();
    let s = codec.composition().num_species();
    let k1 = codec.composition().count(0);

    let first_card = codec.first_species_card();
    if first_card > usize::MAX as u128 {
        return Err(SodError::Overflow {
            n: first_card.to_string(),
        });
    }
    let first_card_usize = first_card as usize;
    // Number of complete configurations sharing a given first-species placement.
    let inner_span = codec.n_total() / first_card;
    let prefix_end = partition.exposed_prefix_end();

    log::debug!(
        "enumerate: n={}, s={}, N={}, first_card={}",
        n,
        s,
        codec.n_total(),
        first_card
    );

    let mut occ = Bitset::new(first_card_usize);
    let mut results: Vec<Representative> = Vec::new();

    if let Some(p) = progress.as_deref_mut() {
        p.set_total(first_card);
    }

    for i1 in 0..first_card_usize {
        if let Some(is_cancelled) = cancel {
            if is_cancelled() {
                results.sort_by_key(|&(r, _)| r);
                return Ok(EnumerationOutcome::Cancelled(results));
            }
        }
        if let Some(p) = progress.as_deref_mut() {
            p.put(i1 as u128);
        }

        if occ.get(i1) {
            continue;
        }
        let subset = colex_unrank(n, k1, i1 as u128);
        if !subset.iter().any(|&site| site < prefix_end) {
            continue;
        }

        let mut seen_within_i1: HashSet<Rank> = HashSet::new();
        for sub_rank in 0..inner_span {
            let r = (i1 as Rank) * inner_span + sub_rank;
            if seen_within_i1.contains(&r) {
                continue;
            }

            let aform = codec.rank_to_aform(r)?;
            let orbit = mark_orbit(action, codec, &aform, r)?;

            for &member in &orbit {
                let member_i1 = (member / inner_span) as usize;
                occ.set(member_i1);
                if member_i1 == i1 {
                    seen_within_i1.insert(member);
                }
            }

            let r_min = *orbit.iter().min().unwrap();
            let d_raw = orbit.len() as u128;
            let canonical_aform = codec.rank_to_aform(r_min)?;
            let correction = degeneracy_correction(&canonical_aform, &partition.boundaries);
            debug_assert_eq!(correction, 1, "degeneracy correction is always an identity ratio (SPEC_FULL §4.4)");
            results.push((r_min, d_raw / correction));

            log::debug!("emitted representative rank={} degeneracy={}", r_min, d_raw);
        }
    }

    if let Some(p) = progress.as_deref_mut() {
        p.put(first_card);
    }

    results.sort_by_key(|&(r, _)| r);
    Ok(EnumerationOutcome::Completed(results))
}

/// Apply every group operation to `aform` (whose own rank is `r`) and collect
/// the distinct ranks reached — the orbit of the configuration (§4.4 step 3
/// "Mark its orbit").
fn mark_orbit(
    action: &crate::base::ActionTable,
    codec: &Codec,
    aform: &AForm,
    r: Rank,
) -> Result<HashSet<Rank>, SodError> {
    let mut orbit = HashSet::new();
    orbit.insert(r);
    for q in 0..action.num_operations() {
        let transformed = action.transform_aform(aform, q);
        let r_prime = codec.aform_to_rank(&transformed)?;
        orbit.insert(r_prime);
    }
    Ok(orbit)
}

/// The degeneracy correction of §4.4: divide by the number of within-orbit
/// intra-species permutations also realized by the stabilizer. As the formula
/// is written (`k_{b,j}! / k_{b,j}!`), this is identically 1 for every orbit
/// block, because the direct group-action orbit computed by [`mark_orbit`]
/// already counts each site assignment exactly once. The function is kept as a
/// named, tested hook documenting that invariant (SPEC_FULL §4.4, §11).
fn degeneracy_correction(aform: &AForm, boundaries: &[usize]) -> u128 {
    let mut factor: u128 = 1;
    for b in 0..boundaries.len() - 1 {
        let (lo, hi) = (boundaries[b], boundaries[b + 1]);
        let mut counts: HashMap<usize, u128> = HashMap::new();
        for &species in &aform[lo..hi] {
            *counts.entry(species).or_insert(0) += 1;
        }
        for &count in counts.values() {
            factor = factor * factorial(count) / factorial(count);
        }
    }
    factor
}

fn factorial(n: u128) -> u128 {
    (1..=n).product::<u128>().max(1)
}

/// Sample ranks (0, N-1, and the midpoint) and confirm the codec round-trips on
/// them before committing to the walk (§4.4 "Failure semantics").
fn validate_roundtrip(codec: &Codec) -> Result<(), SodError> {
    let n_total = codec.n_total();
    let mut samples = vec![0u128, n_total - 1];
    if n_total > 2 {
        samples.push(n_total / 2);
    }
    for r in samples {
        let aform = codec.rank_to_aform(r)?;
        let back = codec.aform_to_rank(&aform)?;
        if back != r {
            return Err(SodError::CodecRoundtrip { rank: r });
        }
    }
    Ok(())
}
