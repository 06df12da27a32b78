//! MapReduce-style jobs for distributed Apriori frequent-itemset mining.
//!
//! This crate owns the data model (`model`), the job error taxonomy (`error`), the `timely`-based
//! MR execution substrate (`runtime`), and the four jobs the driver chains together level by
//! level (`jobs`). `apriori-driver` is the only caller.

pub mod error;
pub mod jobs;
pub mod model;
pub mod runtime;

pub use error::JobError;
pub use model::{FrequentItemset, Item, Itemset, MinSupport, Transaction};
pub use runtime::Runner;
