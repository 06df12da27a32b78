//! Error taxonomy for the job layer.
//!
//! Configuration errors and cross-file inconsistencies are fatal and propagate as
//! `JobError`; malformed individual records are not represented here at all — they are
//! silently skipped at the parsing layer (see `model::Transaction::parse_line` and
//! friends).

use std::path::PathBuf;

use crate::model::Item;
use crate::runtime::Runner;

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid job configuration: {0}")]
    InvalidConfig(String),

    #[error(
        "item {item} has inconsistent support across input files: {a} vs {b}"
    )]
    InconsistentSupport { item: Item, a: u64, b: u64 },

    #[error("runner {runner:?} is not supported by this build")]
    UnsupportedRunner { runner: Runner },

    #[error("MapReduce job {job} failed at level {level}: {cause}")]
    JobFailed {
        job: &'static str,
        level: u32,
        cause: String,
    },
}

impl JobError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> JobError {
        JobError::Io {
            path: path.into(),
            source,
        }
    }
}
