use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
/// Error types for the **subdisorder** core.
pub enum SodError {
    #[error("composition is invalid: {0}")]
    InvalidComposition(String),
    #[error("rank {rank} is out of range [0, {n})")]
    RankOutOfRange { rank: u128, n: u128 },
    #[error("A-form does not match the composition: {0}")]
    AFormMismatch(String),
    #[error("symmetry action is not closed: operation {q} does not map orbit containing site {site} into itself")]
    SymmetryIntegrity { q: usize, site: usize },
    #[error("operation {q} in the action table is not a permutation of the sites")]
    NotAPermutation { q: usize },
    #[error("action table does not contain the identity operation")]
    MissingIdentity,
    #[error("codec round-trip failed for rank {rank}")]
    CodecRoundtrip { rank: u128 },
    #[error("number of configurations {n} does not fit the rank type")]
    Overflow { n: String },
    #[error("enumeration was cancelled")]
    Cancelled,
}
