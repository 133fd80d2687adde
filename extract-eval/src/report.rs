//! Per-case and aggregate evaluation reports.

use serde_json::Value;

/// Outcome of one evaluated case.
#[derive(Debug, Clone)]
pub struct CaseReport {
    /// Dataset identifier of the case.
    pub id: String,
    /// Ground-truth value the case was scored against.
    pub expected: Value,
    /// Validated extraction, or the formatted terminal error.
    pub outcome: Result<Value, String>,
    /// Validation attempts recorded for the case; 0 when the run ended
    /// before any attempt completed (transport or schema failure).
    pub attempts: usize,
    /// Score assigned by the scorer; 0.0 for failed extractions.
    pub score: f64,
}

/// Aggregate results over a dataset, in input order.
#[derive(Debug, Clone)]
pub struct EvalReport {
    /// Per-case reports, ordered as the dataset was.
    pub cases: Vec<CaseReport>,
    /// Cases with a full-credit score.
    pub passed: usize,
    /// Total cases evaluated.
    pub total: usize,
    /// Mean score across all cases (0.0 for an empty dataset).
    pub mean_score: f64,
}

impl EvalReport {
    /// Aggregates per-case reports into a summary.
    #[must_use]
    pub fn from_cases(cases: Vec<CaseReport>) -> Self {
        let total = cases.len();
        let passed = cases
            .iter()
            .filter(|case| case.outcome.is_ok() && case.score >= 1.0)
            .count();
        let mean_score = if total == 0 {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let denominator = total as f64;
            cases.iter().map(|case| case.score).sum::<f64>() / denominator
        };
        Self {
            cases,
            passed,
            total,
            mean_score,
        }
    }
}
