// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the reply pipeline.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Canonical role of one conversation turn.
///
/// Raw stored records carry free-form labels ("user", "bot", "from", ...);
/// only the history normalizer maps those onto this enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    Customer,
    Assistant,
}

impl ChatRole {
    /// Maps a raw role label onto the canonical enumeration, case-insensitively.
    ///
    /// Unrecognized non-empty labels default to `Customer`. This is the single
    /// place the policy lives; see DESIGN.md for the rationale.
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "customer" | "user" => ChatRole::Customer,
            "ai" | "assistant" | "bot" | "system" => ChatRole::Assistant,
            _ => ChatRole::Customer,
        }
    }

    /// Returns the role string used on the chat-completions wire
    /// ("user" / "assistant").
    pub fn as_wire_role(&self) -> &'static str {
        match self {
            ChatRole::Customer => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// One canonical conversation turn, as produced by the history normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    /// Non-empty text. Records with no resolvable content are dropped
    /// during normalization, never stored as empty.
    pub content: String,
}

impl ChatMessage {
    pub fn customer(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Customer,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A completion request handed to a [`ChatBackend`](crate::ChatBackend).
///
/// `messages` holds the bounded history window followed by the new
/// customer turn; the system entry travels separately in `system`.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Shop context used as the system entry.
    pub system: String,
    /// History window plus the final customer turn, in order.
    pub messages: Vec<ChatMessage>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

/// A completion response from a [`ChatBackend`](crate::ChatBackend).
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// The reply text.
    pub content: String,
    /// Model or deployment that produced the reply, when reported.
    pub model: Option<String>,
}

/// The reply produced by one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InboundReply {
    /// Text handed back to the caller and delivered over the channel.
    pub reply_text: String,
    /// Escalation flag; always false in this design.
    pub should_escalate: bool,
}

/// Outcome of handling one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// Inbound text was empty after trimming: no backend call, no store
    /// write, no delivery.
    Ignored,
    /// A reply was produced, persisted, and handed to the outbound channel.
    Replied(InboundReply),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_labels_map_case_insensitively() {
        for label in ["user", "USER", "customer", "Customer"] {
            assert_eq!(ChatRole::from_label(label), ChatRole::Customer);
        }
        for label in ["ai", "AI", "assistant", "Bot", "SYSTEM"] {
            assert_eq!(ChatRole::from_label(label), ChatRole::Assistant);
        }
    }

    #[test]
    fn unrecognized_labels_default_to_customer() {
        assert_eq!(ChatRole::from_label("moderator"), ChatRole::Customer);
        assert_eq!(ChatRole::from_label("??"), ChatRole::Customer);
    }

    #[test]
    fn wire_role_strings() {
        assert_eq!(ChatRole::Customer.as_wire_role(), "user");
        assert_eq!(ChatRole::Assistant.as_wire_role(), "assistant");
    }

    #[test]
    fn chat_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        assert_eq!(ChatRole::Customer.to_string(), "customer");
    }
}
