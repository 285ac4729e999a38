//! Component B: the rank <-> A-form codec (§4.2).
//!
//! A [`Codec`] is built once for a fixed `n` and [`Composition`] and is then a
//! read-only bijection between `0..N` and the A-forms of that composition,
//! where `N` is the multinomial coefficient `n! / (k_1! ... k_s!)`.

use crate::base::{AForm, Composition, Rank, SodError};
use crate::math::{binomial, colex_rank, colex_unrank, complement};

#[derive(Debug, Clone)]
pub struct Codec {
    n: usize,
    composition: Composition,
    /// E[j][p] = C(p, k_j), indexed by species j and remaining-set size p.
    e: Vec<Vec<u128>>,
    /// Radix of species j's digit: C(m_j, k_j) for j in 0..s-1.
    radices: Vec<u128>,
    /// Total number of configurations N.
    n_total: Rank,
}

impl Codec {
    pub fn new(n: usize, composition: Composition) -> Result<Self, SodError> {
        if composition.num_sites() != n {
            return Err(SodError::InvalidComposition(format!(
                "composition sums to {} but there are {} sites",
                composition.num_sites(),
                n
            )));
        }
        let s = composition.num_species();
        let e: Vec<Vec<u128>> = (0..s)
            .map(|j| (0..=n).map(|p| binomial(p, composition.count(j))).collect())
            .collect();
        let radices: Vec<u128> = (0..s - 1)
            .map(|j| e[j][composition.remaining_before(j)])
            .collect();
        let n_total = radices.iter().product::<u128>() * e[s - 1][composition.remaining_before(s - 1)];
        if n_total == 0 {
            return Err(SodError::Overflow {
                n: "0 (degenerate composition)".to_string(),
            });
        }
        Ok(Self {
            n,
            composition,
            e,
            radices,
            n_total,
        })
    }

    pub fn n_total(&self) -> Rank {
        self.n_total
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    /// C(n, k_1): the size of the first-species outer-walk space (§4.4 step 1).
    pub fn first_species_card(&self) -> u128 {
        self.e[0][self.n]
    }

    /// Split a global rank into per-species digits, most-significant (species 0)
    /// first, by successive division/modulo with the species radices (§4.2 decode
    /// step 1, done for all digits up front rather than one at a time).
    fn split_digits(&self, rank: Rank) -> Vec<u128> {
        let s = self.composition.num_species();
        let mut digits = vec![0u128; s - 1];
        let mut remainder = rank;
        for j in (0..s - 1).rev() {
            let radix = self.radices[j];
            digits[j] = remainder % radix;
            remainder /= radix;
        }
        digits
    }

    /// Combine per-species digits (species 0 most significant) into a global rank.
    fn combine_digits(&self, digits: &[u128]) -> Rank {
        let mut acc: Rank = 0;
        for (j, &digit) in digits.iter().enumerate() {
            acc = acc * self.radices[j] + digit;
        }
        acc
    }

    pub fn rank_to_aform(&self, rank: Rank) -> Result<AForm, SodError> {
        if rank >= self.n_total {
            return Err(SodError::RankOutOfRange {
                rank,
                n: self.n_total,
            });
        }
        let digits = self.split_digits(rank);
        let mut remaining: Vec<usize> = (0..self.n).collect();
        let mut aform = vec![usize::MAX; self.n];
        let s = self.composition.num_species();
        for j in 0..s - 1 {
            let k_j = self.composition.count(j);
            let local_subset = colex_unrank(remaining.len(), k_j, digits[j]);
            for &pos in &local_subset {
                aform[remaining[pos]] = j;
            }
            remaining = complement(&local_subset, remaining.len())
                .iter()
                .map(|&pos| remaining[pos])
                .collect();
        }
        // Species s-1 fills whatever remains.
        for &site in &remaining {
            aform[site] = s - 1;
        }
        Ok(aform)
    }

    pub fn aform_to_rank(&self, aform: &[usize]) -> Result<Rank, SodError> {
        let s = self.composition.num_species();
        if aform.len() != self.n {
            return Err(SodError::AFormMismatch(format!(
                "expected {} sites, got {}",
                self.n,
                aform.len()
            )));
        }
        let mut counts = vec![0usize; s];
        for &species in aform {
            if species >= s {
                return Err(SodError::AFormMismatch(format!(
                    "species label {} is out of range for {} species",
                    species, s
                )));
            }
            counts[species] += 1;
        }
        if counts != self.composition.counts() {
            return Err(SodError::AFormMismatch(format!(
                "species multiplicities {:?} do not match composition {:?}",
                counts,
                self.composition.counts()
            )));
        }

        let mut remaining: Vec<usize> = (0..self.n).collect();
        let mut digits = vec![0u128; s - 1];
        for j in 0..s - 1 {
            let local_subset: Vec<usize> = remaining
                .iter()
                .enumerate()
                .filter(|&(_, &site)| aform[site] == j)
                .map(|(pos, _)| pos)
                .collect();
            digits[j] = colex_rank(&local_subset);
            remaining = complement(&local_subset, remaining.len())
                .iter()
                .map(|&pos| remaining[pos])
                .collect();
        }
        Ok(self.combine_digits(&digits))
    }
}
