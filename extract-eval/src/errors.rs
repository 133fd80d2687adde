//! Public error types for the evaluation runner.

use thiserror::Error;

/// Errors raised while loading or running an evaluation.
///
/// Per-case extraction failures are not errors at this level; they are
/// recorded in the report so one bad row never aborts a run.
#[derive(Debug, Error)]
pub enum EvalError {
    /// Reading the dataset source failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A dataset record was malformed.
    #[error("dataset error: {0}")]
    Dataset(String),
}
