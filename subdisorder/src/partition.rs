//! Component C: the orbit partitioner, "grouping" sites into symmetry orbits and
//! relabelling them so orbits are contiguous blocks (§4.3).

use itertools::iproduct;

use crate::base::{ActionTable, Permutation, SodError};
use crate::math::{binary_search_le, sort_ascending};

/// Output of [`partition`]: the relabelled action table, the permutation that
/// produced it, the full orbit-boundary array, and how many leading orbits are
/// "exposed" to the enumerator's outer-loop pruning filter (§4.3 step 5,
/// resolved in SPEC_FULL.md §4.3/§4.4: the filter tests against the *whole*
/// exposed prefix, not orbit 1 alone).
#[derive(Debug, Clone)]
pub struct PartitionResult {
    pub action: ActionTable,
    pub permutation: Permutation,
    /// G[0..=num_orbits]: block b occupies sites `[boundaries[b], boundaries[b+1])`.
    pub boundaries: Vec<usize>,
    /// How many leading blocks of `boundaries` are exposed (g**+1 entries, i.e.
    /// g** blocks) per the partitioner's prefix policy.
    pub exposed_orbits: usize,
}

impl PartitionResult {
    /// The end of the exposed prefix: sites with index `< exposed_prefix_end()`
    /// are guaranteed, by construction, to intersect every k_1-subset of the
    /// sites (the pigeonhole argument behind the enumerator's pruning filter).
    pub fn exposed_prefix_end(&self) -> usize {
        self.boundaries[self.exposed_orbits]
    }

    pub fn num_orbits(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// The index of the orbit block containing `site` (sites are already in the
    /// relabelled, contiguous-block ordering).
    pub fn orbit_of(&self, site: usize) -> usize {
        binary_search_le(&self.boundaries[..self.boundaries.len() - 1], site)
    }
}

/// Partition the `n` substitution sites of `action` into symmetry orbits, and
/// relabel them so orbits are contiguous (§4.3). `first_species_count` is k_1,
/// used to size the exposed prefix (step 5).
pub fn partition(action: &ActionTable, first_species_count: usize) -> Result<PartitionResult, SodError> {
    let n = action.num_sites();
    let mut unseen = vec![true; n];
    let mut order = Vec::with_capacity(n);
    let mut orbit_sizes = Vec::new();

    for i in 0..n {
        if !unseen[i] {
            continue;
        }
        let start = order.len();
        for q in 0..action.num_operations() {
            let j = action.image(i, q);
            if unseen[j] {
                unseen[j] = false;
                order.push(j);
            }
        }
        let mut slice = order[start..].to_vec();
        sort_ascending(&mut slice);
        order[start..].clone_from_slice(&slice);
        orbit_sizes.push(order.len() - start);
    }

    verify_closed(action, &order, &orbit_sizes)?;

    let permutation = Permutation::new(order);
    let relabelled = if permutation.is_identity() {
        action.clone()
    } else {
        action.relabel(&permutation)
    };

    let mut boundaries = Vec::with_capacity(orbit_sizes.len() + 1);
    boundaries.push(0usize);
    for size in &orbit_sizes {
        boundaries.push(boundaries.last().unwrap() + size);
    }

    let target = n - first_species_count + 1;
    let mut exposed_orbits = 0usize;
    while exposed_orbits < orbit_sizes.len() && boundaries[exposed_orbits] < target {
        exposed_orbits += 1;
    }

    Ok(PartitionResult {
        action: relabelled,
        permutation,
        boundaries,
        exposed_orbits,
    })
}

/// Confirm every operation maps each just-built orbit block into itself
/// setwise, in the *old* labeling (before relabelling) — a violation means the
/// operation set was not actually closed on that orbit (§4.3 "Failure").
fn verify_closed(action: &ActionTable, order: &[usize], orbit_sizes: &[usize]) -> Result<(), SodError> {
    let mut boundary = 0usize;
    for &size in orbit_sizes {
        let block = &order[boundary..boundary + size];
        let mut in_block = vec![false; action.num_sites()];
        for &site in block {
            in_block[site] = true;
        }
        for (&site, q) in iproduct!(block, 0..action.num_operations()) {
            let image = action.image(site, q);
            if !in_block[image] {
                return Err(SodError::SymmetryIntegrity { q, site });
            }
        }
        boundary += size;
    }
    Ok(())
}
