// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! History normalization: raw stored records to canonical turns.
//!
//! Conversation documents accumulate records in several legacy shapes;
//! this module is the single adapter that maps them onto
//! [`ChatMessage`]. Shape-sniffing lives here and nowhere else.

use dukaan_core::{ChatMessage, ChatRole};
use serde_json::Value;

/// Maximum history entries used for prompt construction.
///
/// Independent of [`STORE_RETENTION`]; the two bounds are intentionally
/// different.
pub const PROMPT_WINDOW: usize = 10;

/// Maximum raw records retained in the store per conversation.
pub const STORE_RETENTION: usize = 20;

/// Accepted role field names, in priority order.
const ROLE_ALIASES: [&str; 3] = ["role", "sender", "from"];

/// Accepted content field names, in priority order.
const CONTENT_ALIASES: [&str; 3] = ["content", "text", "message"];

/// Converts a raw ordered record sequence into canonical turns.
///
/// Malformed entries are excluded, never an error:
/// - non-object records are skipped;
/// - records whose content resolves to nothing are dropped;
/// - missing or unrecognized role labels default to customer.
pub fn normalize_history(raw: &[Value]) -> Vec<ChatMessage> {
    raw.iter().filter_map(normalize_record).collect()
}

fn normalize_record(record: &Value) -> Option<ChatMessage> {
    let obj = record.as_object()?;

    let content = resolve_alias(obj, &CONTENT_ALIASES)?;
    let role = resolve_alias(obj, &ROLE_ALIASES)
        .map(ChatRole::from_label)
        .unwrap_or(ChatRole::Customer);

    Some(ChatMessage {
        role,
        content: content.to_string(),
    })
}

/// Resolves the first alias whose value is a non-empty string.
fn resolve_alias<'a>(
    obj: &'a serde_json::Map<String, Value>,
    aliases: &[&str],
) -> Option<&'a str> {
    aliases
        .iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_str).filter(|s| !s.is_empty()))
}

/// Truncates normalized turns to the trailing [`PROMPT_WINDOW`] entries,
/// preserving order. Applied after filtering, immediately before prompt
/// construction.
pub fn prompt_window(mut turns: Vec<ChatMessage>) -> Vec<ChatMessage> {
    let len = turns.len();
    if len > PROMPT_WINDOW {
        turns.split_off(len - PROMPT_WINDOW)
    } else {
        turns
    }
}

/// Truncates a raw record array to the trailing [`STORE_RETENTION`]
/// entries, preserving order. Idempotent: re-capping an already-capped
/// array is a no-op.
pub fn cap_retention(mut raw: Vec<Value>) -> Vec<Value> {
    let len = raw.len();
    if len > STORE_RETENTION {
        raw.split_off(len - STORE_RETENTION)
    } else {
        raw
    }
}
