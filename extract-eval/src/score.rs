//! Scoring extracted values against ground truth.

use serde_json::Value;

/// Scores an extracted value against the expected value in `[0.0, 1.0]`.
pub trait Scorer: Send + Sync {
    /// Returns the score; 1.0 is a full match.
    fn score(&self, expected: &Value, actual: &Value) -> f64;
}

/// Full credit only for exact structural equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatch;

impl Scorer for ExactMatch {
    fn score(&self, expected: &Value, actual: &Value) -> f64 {
        if expected == actual {
            1.0
        } else {
            0.0
        }
    }
}

/// Numeric comparison within an absolute tolerance.
///
/// Non-numeric values fall back to exact equality, so the scorer can be
/// applied to mixed datasets where only some rows are numeric answers.
#[derive(Debug, Clone, Copy)]
pub struct NumericTolerance {
    /// Maximum absolute difference still counted as a match.
    pub epsilon: f64,
}

impl Default for NumericTolerance {
    fn default() -> Self {
        Self { epsilon: 1e-6 }
    }
}

impl Scorer for NumericTolerance {
    fn score(&self, expected: &Value, actual: &Value) -> f64 {
        match (expected.as_f64(), actual.as_f64()) {
            (Some(expected), Some(actual)) => {
                if (expected - actual).abs() <= self.epsilon {
                    1.0
                } else {
                    0.0
                }
            }
            _ => ExactMatch.score(expected, actual),
        }
    }
}
