//! Concurrency-bounded evaluation over independent extraction calls.
//!
//! Cases are independent, so they run concurrently up to a configured
//! ceiling; the dominant cost is the responder round trip. Results are
//! collected back into dataset order regardless of completion order.

use extract_core::{ExtractError, ExtractionEngine, Responder};
use futures::stream::{self, StreamExt};

use crate::dataset::EvalCase;
use crate::report::{CaseReport, EvalReport};
use crate::score::Scorer;

/// Runs a dataset of extraction cases under a concurrency ceiling.
#[derive(Debug, Clone, Copy)]
pub struct EvalRunner {
    max_concurrency: usize,
}

impl Default for EvalRunner {
    fn default() -> Self {
        Self {
            max_concurrency: 10,
        }
    }
}

impl EvalRunner {
    /// Runner with the default ceiling of 10 in-flight cases.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of simultaneously in-flight cases.
    ///
    /// Values below 1 are clamped to 1.
    #[must_use]
    pub const fn max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = if max_concurrency == 0 {
            1
        } else {
            max_concurrency
        };
        self
    }

    /// Evaluates every case and returns the aggregated report.
    ///
    /// Per-case failures (exhausted retries, transport errors) become
    /// `Err` outcomes in the report; the run itself never aborts early.
    pub async fn run<R, S>(
        &self,
        engine: &ExtractionEngine,
        responder: &R,
        scorer: &S,
        cases: Vec<EvalCase>,
    ) -> EvalReport
    where
        R: Responder + ?Sized,
        S: Scorer + ?Sized,
    {
        let reports = stream::iter(
            cases
                .into_iter()
                .map(|case| evaluate_case(engine, responder, scorer, case)),
        )
        .buffered(self.max_concurrency)
        .collect::<Vec<_>>()
        .await;

        let report = EvalReport::from_cases(reports);
        tracing::info!(
            total = report.total,
            passed = report.passed,
            mean_score = report.mean_score,
            "evaluation complete"
        );
        report
    }
}

async fn evaluate_case<R, S>(
    engine: &ExtractionEngine,
    responder: &R,
    scorer: &S,
    case: EvalCase,
) -> CaseReport
where
    R: Responder + ?Sized,
    S: Scorer + ?Sized,
{
    let EvalCase {
        id,
        messages,
        expected,
    } = case;

    match engine.extract(responder, messages).await {
        Ok((value, metrics)) => {
            let score = scorer.score(&expected, &value);
            tracing::debug!(
                case = %id,
                attempts = metrics.total_attempts,
                score,
                "case evaluated"
            );
            CaseReport {
                id,
                expected,
                outcome: Ok(value),
                attempts: metrics.total_attempts,
                score,
            }
        }
        Err(error) => {
            let attempts = match &error {
                ExtractError::ExhaustedRetries { attempts, .. }
                | ExtractError::Deserialize { attempts, .. } => *attempts,
                ExtractError::Transport(_) | ExtractError::Schema(_) => 0,
            };
            tracing::debug!(case = %id, attempts, error = %error, "case failed");
            CaseReport {
                id,
                expected,
                outcome: Err(error.to_string()),
                attempts,
                score: 0.0,
            }
        }
    }
}
