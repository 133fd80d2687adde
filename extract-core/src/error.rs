//! Error types for extraction with per-attempt history.

use std::time::Duration;

use thiserror::Error;

use crate::metrics::ExtractionMetrics;
use crate::responder::TransportError;
use crate::validate::FieldError;

/// Record of one failed attempt: what was submitted and why it failed.
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    /// The attempt number (1-indexed).
    pub attempt_number: usize,
    /// Parsed payload submitted during this attempt; `Null` when the raw
    /// completion could not be parsed at all.
    pub submitted: serde_json::Value,
    /// All validation errors from this attempt, in schema order.
    pub errors: Vec<FieldError>,
    /// Raw completion text as returned by the responder.
    pub raw_output: String,
    /// Elapsed wall time when the attempt finished.
    pub elapsed: Duration,
}

/// Errors surfaced by [`ExtractionEngine::extract`](crate::ExtractionEngine::extract).
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Backend communication failed; propagated without retrying.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Every permitted attempt failed validation.
    #[error("extraction failed after {attempts} attempts")]
    ExhaustedRetries {
        /// Total number of attempts made.
        attempts: usize,
        /// One record per failed attempt, in order.
        history: Vec<AttemptRecord>,
        /// Metrics accumulated across all attempts.
        metrics: ExtractionMetrics,
    },

    /// The schema cannot drive an extraction (e.g. no fields declared).
    #[error("schema error: {0}")]
    Schema(String),

    /// Schema-valid output failed to deserialize into the target type.
    #[error("deserialization failed after {attempts} attempts: {message}")]
    Deserialize {
        /// Deserializer error message.
        message: String,
        /// The validated JSON that failed to deserialize.
        raw: String,
        /// Attempts spent reaching the validated payload.
        attempts: usize,
    },
}
