//! Conversation turns exchanged with a responder.

use serde::{Deserialize, Serialize};

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Standing instruction.
    System,
    /// Caller-supplied input (including corrective feedback).
    User,
    /// Model output echoed back into the conversation.
    Assistant,
}

/// One piece of turn content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Plain text.
    Text {
        /// The text body.
        text: String,
    },
    /// Reference to an image by URL.
    ImageUrl {
        /// Image location.
        url: String,
    },
}

/// A single conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who produced the turn.
    pub role: Role,
    /// Turn content; mixed text and image parts are allowed.
    pub content: Vec<ContentPart>,
}

impl Message {
    /// Text-only turn with the given role.
    #[must_use]
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: vec![ContentPart::Text { text: text.into() }],
        }
    }

    /// Text-only system turn.
    #[must_use]
    pub fn system(text: impl Into<String>) -> Self {
        Self::text(Role::System, text)
    }

    /// Text-only user turn.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::text(Role::User, text)
    }

    /// Text-only assistant turn.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::text(Role::Assistant, text)
    }

    /// User turn carrying a single image reference.
    #[must_use]
    pub fn user_image(url: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentPart::ImageUrl { url: url.into() }],
        }
    }

    /// Character count across all parts, for token estimation.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.content
            .iter()
            .map(|part| match part {
                ContentPart::Text { text } => text.chars().count(),
                ContentPart::ImageUrl { url } => url.chars().count(),
            })
            .sum()
    }
}
