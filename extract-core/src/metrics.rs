//! Metrics tracking and token estimation for extraction runs.

use std::time::Duration;

/// Metrics collected during one extraction run.
#[derive(Debug, Clone, Default)]
pub struct ExtractionMetrics {
    /// Total number of responder calls made.
    pub total_attempts: usize,
    /// Wall-clock time across all attempts.
    pub wall_time: Duration,
    /// Estimated input tokens sent across all attempts.
    pub estimated_input_tokens: usize,
    /// Estimated output tokens received across all attempts.
    pub estimated_output_tokens: usize,
}

/// Estimate token count from text using the 4-chars-per-token heuristic.
///
/// Counts characters rather than bytes so multi-byte text is not
/// overestimated; rounds up to avoid underestimation.
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}
