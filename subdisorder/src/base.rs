mod action;
mod composition;
mod error;
mod permutation;

pub use action::ActionTable;
pub use composition::Composition;
pub use error::SodError;
pub use permutation::{apply_permutation, Permutation};

/// Rank of a configuration in [0, N). Wide enough for the N ~ 10^18 the distilled
/// spec calls out (§4.1); overflow beyond that is the caller's responsibility.
pub type Rank = u128;
/// An A-form assignment vector: `a[i]` is the species index (0-based) at site `i`.
pub type AForm = Vec<usize>;
