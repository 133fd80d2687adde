//! Dataset records consumed by the evaluation runner.
//!
//! The runner only needs an iterable of cases; where they come from is
//! the caller's business. A JSONL loader is provided because that is the
//! common interchange format for evaluation rows.

use std::io::BufRead;

use extract_core::Message;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::EvalError;

/// One evaluation row: a conversation to extract from and the value the
/// extraction is scored against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalCase {
    /// Stable identifier for reporting.
    pub id: String,
    /// Conversation turns handed to the engine.
    pub messages: Vec<Message>,
    /// Ground-truth value for scoring.
    pub expected: Value,
}

impl EvalCase {
    /// Single-user-turn convenience constructor.
    #[must_use]
    pub fn from_prompt(id: impl Into<String>, prompt: impl Into<String>, expected: Value) -> Self {
        Self {
            id: id.into(),
            messages: vec![Message::user(prompt)],
            expected,
        }
    }
}

/// Reads one [`EvalCase`] per line from a JSONL source.
///
/// Blank lines are skipped. Parse failures name the offending line.
///
/// # Errors
///
/// Returns [`EvalError::Io`] on read failure and [`EvalError::Dataset`]
/// on malformed records.
pub fn load_jsonl<R: BufRead>(reader: R) -> Result<Vec<EvalCase>, EvalError> {
    let mut cases = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let case = serde_json::from_str(&line).map_err(|error| {
            EvalError::Dataset(format!("line {}: {error}", index + 1))
        })?;
        cases.push(case);
    }
    Ok(cases)
}
