//! The bounded retry loop driving validated extraction.

use serde_json::Value;
use tokio::time::Instant;

use crate::error::{AttemptRecord, ExtractError};
use crate::feedback::{build_parse_feedback, build_validation_feedback};
use crate::message::Message;
use crate::metrics::ExtractionMetrics;
use crate::responder::Responder;
use crate::schema::Schema;
use crate::state::{advance, Step};
use crate::validate::{validate, FieldError};

/// Runs schema-constrained extraction against a [`Responder`], retrying
/// with accumulated error feedback on validation failure.
///
/// The engine holds no state across calls; each `extract` owns its own
/// conversation and attempt history. Transport failures are never
/// retried, and the only suspension point is the responder call, so
/// dropping the returned future cancels cleanly between attempts.
pub struct ExtractionEngine {
    schema: Schema,
    max_retries: usize,
}

impl ExtractionEngine {
    /// Creates an engine for the given schema with the default retry
    /// bound of 2 (three total attempts).
    #[must_use]
    pub const fn new(schema: Schema) -> Self {
        Self {
            schema,
            max_retries: 2,
        }
    }

    /// Sets the number of additional attempts permitted after the first.
    ///
    /// `max_retries = 0` means exactly one attempt.
    #[must_use]
    pub const fn max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Runs the extraction loop and returns the validated payload.
    ///
    /// The schema manifest is appended to the conversation as a trailing
    /// system turn before the first attempt and also passed to every
    /// responder call, so backends with native schema support and
    /// text-only backends both see it.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::Transport`] if the responder fails; surfaced
    ///   immediately without consuming a retry.
    /// - [`ExtractError::ExhaustedRetries`] when the final attempt still
    ///   fails validation, carrying one [`AttemptRecord`] per attempt.
    /// - [`ExtractError::Schema`] if the schema declares no fields.
    pub async fn extract<R>(
        &self,
        responder: &R,
        initial_messages: Vec<Message>,
    ) -> Result<(Value, ExtractionMetrics), ExtractError>
    where
        R: Responder + ?Sized,
    {
        if self.schema.fields().is_empty() {
            return Err(ExtractError::Schema(
                "schema must declare at least one field".to_string(),
            ));
        }

        let start = Instant::now();
        let manifest = self.schema.describe();
        let total_attempts = self.max_retries + 1;

        let mut messages = initial_messages;
        messages.push(Message::system(format!(
            "Respond with a single JSON object matching this schema exactly:\n{}",
            serde_json::to_string_pretty(&manifest).unwrap_or_else(|_| manifest.to_string()),
        )));

        let mut history: Vec<AttemptRecord> = Vec::new();
        let mut input_chars: usize = 0;
        let mut output_chars: usize = 0;
        let mut attempt_index: usize = 0;

        loop {
            let attempt_number = attempt_index + 1;
            input_chars += messages.iter().map(Message::char_count).sum::<usize>();

            let raw_output = responder.respond(&messages, &manifest).await?;
            output_chars += raw_output.chars().count();

            let parsed = serde_json::from_str::<Value>(&raw_output);
            let (submitted, errors) = match &parsed {
                Ok(value) => (value.clone(), validate(&self.schema, value)),
                Err(parse_error) => (
                    Value::Null,
                    vec![FieldError::root(format!(
                        "response was not parsable JSON: {parse_error}"
                    ))],
                ),
            };

            match advance(attempt_index, self.max_retries, errors.is_empty()) {
                Step::Done => {
                    let metrics = ExtractionMetrics {
                        total_attempts: attempt_number,
                        wall_time: start.elapsed(),
                        estimated_input_tokens: input_chars.div_ceil(4),
                        estimated_output_tokens: output_chars.div_ceil(4),
                    };
                    return Ok((submitted, metrics));
                }
                Step::Retry { next } => {
                    let feedback = match &parsed {
                        Ok(value) => build_validation_feedback(
                            &manifest,
                            value,
                            &errors,
                            attempt_number,
                            total_attempts,
                        ),
                        Err(parse_error) => build_parse_feedback(
                            &raw_output,
                            &parse_error.to_string(),
                            attempt_number,
                            total_attempts,
                            &manifest,
                        ),
                    };
                    history.push(AttemptRecord {
                        attempt_number,
                        submitted,
                        errors,
                        raw_output: raw_output.clone(),
                        elapsed: start.elapsed(),
                    });
                    messages.push(Message::assistant(raw_output));
                    messages.push(Message::user(feedback));
                    attempt_index = next;
                }
                Step::Exhausted => {
                    history.push(AttemptRecord {
                        attempt_number,
                        submitted,
                        errors,
                        raw_output,
                        elapsed: start.elapsed(),
                    });
                    let metrics = ExtractionMetrics {
                        total_attempts,
                        wall_time: start.elapsed(),
                        estimated_input_tokens: input_chars.div_ceil(4),
                        estimated_output_tokens: output_chars.div_ceil(4),
                    };
                    return Err(ExtractError::ExhaustedRetries {
                        attempts: total_attempts,
                        history,
                        metrics,
                    });
                }
            }
        }
    }

    /// Extracts and deserializes the validated payload into `T`.
    ///
    /// # Errors
    ///
    /// Everything [`extract`](Self::extract) returns, plus
    /// [`ExtractError::Deserialize`] when schema-valid JSON does not map
    /// onto the target type.
    pub async fn extract_typed<T, R>(
        &self,
        responder: &R,
        initial_messages: Vec<Message>,
    ) -> Result<(T, ExtractionMetrics), ExtractError>
    where
        T: serde::de::DeserializeOwned,
        R: Responder + ?Sized,
    {
        let (value, metrics) = self.extract(responder, initial_messages).await?;
        let raw = value.to_string();
        let typed =
            serde_json::from_value(value).map_err(|error| ExtractError::Deserialize {
                message: error.to_string(),
                raw,
                attempts: metrics.total_attempts,
            })?;
        Ok((typed, metrics))
    }
}
