use std::path::PathBuf;

use apriori_dataflow::JobError;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("--min-support and --min-support-decimal are mutually exclusive; exactly one must be given")]
    ConflictingMinSupport,

    #[error("--max-iterations must be at least 1")]
    InvalidMaxIterations,

    #[error("--min-support-decimal must be between 0.0 and 1.0")]
    InvalidDecimalSupport,

    #[error("--min-support must be at least 1")]
    InvalidAbsoluteSupport,

    #[error(transparent)]
    Job(#[from] JobError),
}
