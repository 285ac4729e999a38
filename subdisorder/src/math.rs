mod binomial;
mod bitset;

pub(crate) use binomial::{binary_search_le, binomial, colex_rank, colex_unrank, complement, sort_ascending};
pub(crate) use bitset::Bitset;
