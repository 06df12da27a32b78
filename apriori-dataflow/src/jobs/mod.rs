//! The four MapReduce-style jobs the driver chains level by level.

pub mod candgen;
pub mod candidates2;
pub mod convert;
pub mod count;

pub use candgen::generate_candidate_itemsets;
pub use candidates2::generate_candidate_2_itemsets;
pub use convert::count_transactions;
pub use count::{count_candidates, count_singletons};
