use super::error::SodError;
use super::permutation::Permutation;

/// The symmetry action table M of §3: one column per group operation, each column
/// a permutation of the `n` substitution sites.
///
/// `action.image(site, q)` is M[site, q] — the site that `site` maps to under
/// operation `q`.
#[derive(Debug, Clone)]
pub struct ActionTable {
    num_sites: usize,
    operations: Vec<Permutation>,
}

impl ActionTable {
    /// Build an action table, checking that every operation is a bijection of
    /// `0..num_sites` and that at least one of them is the identity.
    pub fn new(num_sites: usize, operations: Vec<Permutation>) -> Result<Self, SodError> {
        for (q, op) in operations.iter().enumerate() {
            if op.size() != num_sites {
                return Err(SodError::NotAPermutation { q });
            }
            let mut seen = vec![false; num_sites];
            for i in 0..num_sites {
                let j = op.apply(i);
                if j >= num_sites || seen[j] {
                    return Err(SodError::NotAPermutation { q });
                }
                seen[j] = true;
            }
        }
        if !operations.iter().any(Permutation::is_identity) {
            return Err(SodError::MissingIdentity);
        }
        Ok(Self {
            num_sites,
            operations,
        })
    }

    pub fn num_sites(&self) -> usize {
        self.num_sites
    }

    pub fn num_operations(&self) -> usize {
        self.operations.len()
    }

    pub fn operations(&self) -> &[Permutation] {
        &self.operations
    }

    pub fn image(&self, site: usize, q: usize) -> usize {
        self.operations[q].apply(site)
    }

    /// Apply an A-form via operation `q`: `a'[i] = a[M[i, q]]`.
    pub fn transform_aform(&self, a: &[usize], q: usize) -> Vec<usize> {
        (0..self.num_sites).map(|i| a[self.image(i, q)]).collect()
    }

    /// Rebuild the table after relabelling sites by `perm` (§4.3 step 4):
    /// `new_M[i, q] = perm^-1(old_M[perm(i), q])`.
    pub fn relabel(&self, perm: &Permutation) -> Self {
        let inv = perm.inverse();
        let operations = self
            .operations
            .iter()
            .map(|op| {
                let mapping = (0..self.num_sites)
                    .map(|i| inv.apply(op.apply(perm.apply(i))))
                    .collect();
                Permutation::new(mapping)
            })
            .collect();
        Self {
            num_sites: self.num_sites,
            operations,
        }
    }
}
