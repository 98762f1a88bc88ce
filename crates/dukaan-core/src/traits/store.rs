// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation store trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::DukaanError;

/// A document collection keyed by `(shop_id, customer_key)` holding an
/// ordered array of raw message records.
///
/// Absence of a conversation is not an error: reads return an empty
/// array. Writes replace the whole `messages` field (upsert semantics,
/// no explicit create step); the caller is responsible for capping the
/// array before writing.
#[async_trait]
pub trait ConversationStore: Send + Sync + 'static {
    /// Fetches the raw message array for a conversation, oldest first.
    /// A missing conversation yields an empty vector.
    async fn fetch_history(
        &self,
        shop_id: &str,
        customer_key: &str,
    ) -> Result<Vec<Value>, DukaanError>;

    /// Replaces the conversation's `messages` array and bumps its
    /// updated timestamp, creating the document if it does not exist.
    async fn upsert_conversation(
        &self,
        shop_id: &str,
        customer_key: &str,
        messages: &[Value],
    ) -> Result<(), DukaanError>;
}
