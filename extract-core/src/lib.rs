#![deny(missing_docs)]
//! Schema-validated structured extraction with bounded retry feedback.
//!
//! The engine sends a schema-constrained conversation to a backend
//! [`Responder`], validates the raw completion against an explicit
//! [`Schema`], and on validation failure retries with corrective
//! feedback up to a configured bound. Transport failures are never
//! retried; exhausting the bound surfaces the full attempt history.
//!
//! ```no_run
//! # use extract_core::{ExtractionEngine, FieldKind, Message, Responder, Schema};
//! # async fn example(responder: &dyn Responder) -> Result<(), Box<dyn std::error::Error>> {
//! let schema = Schema::builder()
//!     .field("label", FieldKind::choice(["spam", "not_spam"]))
//!     .build();
//!
//! let engine = ExtractionEngine::new(schema).max_retries(3);
//! let (value, metrics) = engine
//!     .extract(responder, vec![Message::user("Classify: free money now!!!")])
//!     .await?;
//! assert!(metrics.total_attempts >= 1);
//! # Ok(())
//! # }
//! ```

/// The bounded retry loop.
pub mod engine;
/// Error types with per-attempt history.
pub mod error;
/// Corrective feedback message builders.
pub mod feedback;
/// Conversation turn types.
pub mod message;
/// Metrics and token estimation.
pub mod metrics;
/// The backend capability trait.
pub mod responder;
/// Declarative schema descriptions.
pub mod schema;
/// Pure retry-loop transition logic.
pub mod state;
/// Recursive payload validation.
pub mod validate;

pub use engine::ExtractionEngine;
pub use error::{AttemptRecord, ExtractError};
pub use message::{ContentPart, Message, Role};
pub use metrics::{estimate_tokens, ExtractionMetrics};
pub use responder::{Responder, TransportError};
pub use schema::{Field, FieldKind, Schema, SchemaBuilder};
pub use validate::{validate, FieldError};
