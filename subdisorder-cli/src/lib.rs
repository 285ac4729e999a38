//! Library half of the `subdisorder` CLI: the ambient collaborators (§10.4,
//! §10.5, §10.6) kept in a library target so the integration tests under
//! `tests/` can exercise them directly, with `src/main.rs` staying a thin
//! orchestration layer over them.

pub mod config;
pub mod error;
pub mod progress;
pub mod structure;
pub mod symmetry;
