//! Pure transition logic for the bounded retry loop.
//!
//! The loop itself lives in [`engine`](crate::engine); the decision of
//! what follows each attempt is kept here as a pure function so the
//! bound and terminal conditions are testable without a responder.

/// What the loop does after validating one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Validation succeeded; return the value.
    Done,
    /// Validation failed with attempts remaining; run the next attempt
    /// with feedback attached.
    Retry {
        /// Zero-based index of the next attempt.
        next: usize,
    },
    /// Validation failed on the final permitted attempt.
    Exhausted,
}

/// Decides the step following attempt `attempt_index` (zero-based).
///
/// `max_retries` bounds the number of additional attempts after the
/// first, so `attempt_index` ranges over `0..=max_retries`.
#[must_use]
pub const fn advance(attempt_index: usize, max_retries: usize, valid: bool) -> Step {
    if valid {
        Step::Done
    } else if attempt_index < max_retries {
        Step::Retry {
            next: attempt_index + 1,
        }
    } else {
        Step::Exhausted
    }
}
