// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt assembly and shop context rendering.

use dukaan_core::{ChatMessage, CompletionRequest};
use serde_json::Value;

use crate::normalize::{normalize_history, prompt_window};

/// System prompt used when no shop binds to the request.
pub const FALLBACK_SHOP_CONTEXT: &str = "You are a helpful assistant for a general store.";

/// Shop profile fields that feed the system prompt.
#[derive(Debug, Clone, Default)]
pub struct ShopProfile {
    pub name: String,
    pub description: Option<String>,
    /// Optional tone instruction, e.g. "Be formal."
    pub tone: Option<String>,
}

/// Renders a shop profile into the system-prompt string.
///
/// The pipeline itself treats the result as opaque; this builder exists
/// so callers with a shop lookup don't each invent their own wording.
pub fn shop_context_for(profile: &ShopProfile) -> String {
    let mut context = format!("You are the chat assistant for {}.", profile.name);
    if let Some(description) = profile.description.as_deref().filter(|d| !d.is_empty()) {
        context.push(' ');
        context.push_str(description);
        if !description.ends_with('.') {
            context.push('.');
        }
    }
    match profile.tone.as_deref().filter(|t| !t.is_empty()) {
        Some(tone) => {
            context.push(' ');
            context.push_str(tone);
        }
        None => context.push_str(" Keep replies short and friendly."),
    }
    context.push_str(" Reply in the same language the customer writes in.");
    context
}

/// Builds the completion request for one inbound message: one system
/// entry, at most [`PROMPT_WINDOW`] normalized history turns, then the
/// new customer turn.
///
/// [`PROMPT_WINDOW`]: crate::normalize::PROMPT_WINDOW
pub fn build_prompt(
    shop_context: Option<&str>,
    raw_history: &[Value],
    inbound_text: &str,
    max_tokens: u32,
    temperature: f32,
) -> CompletionRequest {
    let system = shop_context
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(FALLBACK_SHOP_CONTEXT)
        .to_string();

    let mut messages = prompt_window(normalize_history(raw_history));
    messages.push(ChatMessage::customer(inbound_text));

    CompletionRequest {
        system,
        messages,
        max_tokens,
        temperature,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dukaan_core::ChatRole;
    use serde_json::json;

    #[test]
    fn prompt_matches_worked_scenario() {
        // History [{role:"user",content:"hi"}], inbound "price of shirt?",
        // context "You sell shirts." -> system + hi + new turn.
        let raw = vec![json!({"role": "user", "content": "hi"})];
        let request = build_prompt(Some("You sell shirts."), &raw, "price of shirt?", 300, 0.7);

        assert_eq!(request.system, "You sell shirts.");
        assert_eq!(
            request.messages,
            vec![
                ChatMessage::customer("hi"),
                ChatMessage::customer("price of shirt?"),
            ]
        );
    }

    #[test]
    fn missing_or_blank_context_falls_back() {
        let request = build_prompt(None, &[], "hello", 300, 0.7);
        assert_eq!(request.system, FALLBACK_SHOP_CONTEXT);

        let request = build_prompt(Some("   "), &[], "hello", 300, 0.7);
        assert_eq!(request.system, FALLBACK_SHOP_CONTEXT);
    }

    #[test]
    fn fifteen_records_yield_at_most_eleven_turns() {
        // 10 history entries + 1 new customer entry; the system entry
        // travels separately on the request.
        let raw: Vec<_> = (0..15)
            .map(|i| json!({"role": "user", "content": format!("m{i}")}))
            .collect();
        let request = build_prompt(Some("ctx"), &raw, "new", 300, 0.7);
        assert_eq!(request.messages.len(), 11);
        assert_eq!(request.messages[0].content, "m5");
        assert_eq!(request.messages[10].content, "new");
        assert_eq!(request.messages[10].role, ChatRole::Customer);
    }

    #[test]
    fn shop_context_includes_profile_fields() {
        let profile = ShopProfile {
            name: "Bilal Garments".into(),
            description: Some("We sell stitched and unstitched clothes".into()),
            tone: None,
        };
        let context = shop_context_for(&profile);
        assert!(context.contains("Bilal Garments"));
        assert!(context.contains("unstitched clothes."));
        assert!(context.contains("same language"));
    }

    #[test]
    fn tone_overrides_default_instruction() {
        let profile = ShopProfile {
            name: "Shop".into(),
            description: None,
            tone: Some("Be formal.".into()),
        };
        let context = shop_context_for(&profile);
        assert!(context.contains("Be formal."));
        assert!(!context.contains("short and friendly"));
    }
}
