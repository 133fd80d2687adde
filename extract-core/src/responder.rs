//! The backend capability consumed by the engine.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::message::Message;

/// Communication failure with a backend.
///
/// Covers the non-recoverable class of failures: unreachable service,
/// authentication rejection, rate limiting. The engine never retries
/// these; they propagate to the caller unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("transport failure: {cause}")]
pub struct TransportError {
    /// What went wrong, as reported by the backend.
    pub cause: String,
}

impl TransportError {
    /// Creates a transport error with the given cause.
    #[must_use]
    pub fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
        }
    }
}

/// Capability abstraction over a model-serving backend.
///
/// Implementations receive the full conversation plus the rendered schema
/// manifest and return the raw model completion text. The engine is
/// agnostic to which backend is behind the trait; one implementation per
/// backend lives with the caller.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Sends the conversation to the backend and returns its raw completion.
    async fn respond(
        &self,
        messages: &[Message],
        schema: &Value,
    ) -> Result<String, TransportError>;
}
