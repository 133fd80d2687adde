#![deny(missing_docs)]
//! Evaluation runner for schema-validated extraction.
//!
//! Loads dataset rows, runs each one through an
//! [`ExtractionEngine`](extract_core::ExtractionEngine) against a backend
//! responder under a concurrency ceiling, scores the validated output
//! against ground truth, and aggregates per-case reports.

/// Dataset records and JSONL loading.
pub mod dataset;
/// Public error types.
pub mod errors;
/// Per-case and aggregate reports.
pub mod report;
/// The concurrency-bounded runner.
pub mod runner;
/// Scoring strategies.
pub mod score;

pub use dataset::{load_jsonl, EvalCase};
pub use errors::EvalError;
pub use report::{CaseReport, EvalReport};
pub use runner::EvalRunner;
pub use score::{ExactMatch, NumericTolerance, Scorer};
