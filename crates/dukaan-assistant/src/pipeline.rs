// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The reply pipeline: one inbound customer message in, one persisted,
//! delivered reply out.
//!
//! Per invocation the pipeline passes through validate-input ->
//! fetch-history -> build-prompt -> generate -> persist -> deliver ->
//! respond, linearly. The pipeline itself is stateless between
//! invocations; all conversation state lives in the store.
//!
//! Invocations for the same customer key are serialized through a
//! per-key async mutex held across the read-modify-write, so two
//! near-simultaneous messages from one customer cannot drop each
//! other's assistant turn. Distinct keys run fully concurrently.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use dukaan_core::{
    ChatBackend, ConversationStore, DukaanError, InboundReply, OutboundChannel, ReplyOutcome,
};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::normalize::cap_retention;
use crate::prompt::build_prompt;

/// Fixed apology substituted when the backend fails or times out.
pub const DEFAULT_FALLBACK_REPLY: &str =
    "Sorry, I'm having trouble answering right now. Please try again in a moment.";

/// Behavior knobs for a [`ReplyPipeline`].
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Tenant identifier used to key conversations.
    pub shop_id: String,
    /// Bound on one backend completion call; expiry is treated
    /// identically to a backend failure.
    pub reply_timeout: Duration,
    /// Customer-visible reply substituted on backend failure.
    pub fallback_reply: String,
    /// Maximum tokens the backend may generate.
    pub max_tokens: u32,
    /// Backend sampling temperature.
    pub temperature: f32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            shop_id: "default".to_string(),
            reply_timeout: Duration::from_secs(20),
            fallback_reply: DEFAULT_FALLBACK_REPLY.to_string(),
            max_tokens: 300,
            temperature: 0.7,
        }
    }
}

/// Orchestrates normalizer, backend, store and outbound channel for one
/// inbound message at a time.
///
/// All collaborators are injected trait objects; tests swap them for the
/// doubles in `dukaan-test-utils`.
pub struct ReplyPipeline {
    store: Arc<dyn ConversationStore>,
    backend: Arc<dyn ChatBackend>,
    channel: Arc<dyn OutboundChannel>,
    settings: PipelineSettings,
    /// Per-customer-key locks serializing the read-modify-write.
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl ReplyPipeline {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        backend: Arc<dyn ChatBackend>,
        channel: Arc<dyn OutboundChannel>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            store,
            backend,
            channel,
            settings,
            locks: DashMap::new(),
        }
    }

    /// Returns the settings this pipeline runs with.
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Handles one inbound customer message end to end.
    ///
    /// Empty (post-trim) input short-circuits to [`ReplyOutcome::Ignored`]
    /// with no backend call, no store write and no delivery. Store
    /// errors propagate; backend failures are substituted with the
    /// fallback reply; delivery failures are logged only. The worst the
    /// customer ever sees is the fallback string.
    pub async fn handle_inbound(
        &self,
        shop_context: Option<&str>,
        customer_key: &str,
        inbound_text: &str,
    ) -> Result<ReplyOutcome, DukaanError> {
        let text = inbound_text.trim();
        if text.is_empty() {
            debug!(customer_key, "ignoring empty inbound message");
            return Ok(ReplyOutcome::Ignored);
        }

        let reply_text = {
            let lock = self.key_lock(customer_key);
            let _guard = lock.lock().await;

            // Absence of a conversation is an empty history; a failing
            // read aborts the invocation rather than risk overwriting
            // unknown state.
            let raw = self
                .store
                .fetch_history(&self.settings.shop_id, customer_key)
                .await?;

            let reply_text = self.generate(shop_context, &raw, text).await;

            // Append both turns, cap, and replace the whole document.
            let now = chrono::Utc::now().to_rfc3339();
            let mut messages = raw;
            messages.push(json!({
                "role": "customer",
                "content": text,
                "timestamp": now,
            }));
            messages.push(json!({
                "role": "assistant",
                "content": reply_text,
                "timestamp": now,
            }));
            let capped = cap_retention(messages);

            self.store
                .upsert_conversation(&self.settings.shop_id, customer_key, &capped)
                .await?;

            reply_text
        };

        // Best-effort delivery to the original sender address; a failed
        // send never rolls back the store write and is not retried.
        if let Err(e) = self.channel.send_text(customer_key, &reply_text).await {
            warn!(customer_key, error = %e, "outbound delivery failed");
        }

        Ok(ReplyOutcome::Replied(InboundReply {
            reply_text,
            should_escalate: false,
        }))
    }

    /// Produces a reply for the given raw history without touching the
    /// store or the outbound channel.
    ///
    /// Used by callers that carry their own history (the chat API's
    /// inline-history mode). Same prompt construction and failure
    /// substitution as [`handle_inbound`](Self::handle_inbound).
    pub async fn generate_reply(
        &self,
        shop_context: Option<&str>,
        raw_history: &[Value],
        inbound_text: &str,
    ) -> ReplyOutcome {
        let text = inbound_text.trim();
        if text.is_empty() {
            return ReplyOutcome::Ignored;
        }
        ReplyOutcome::Replied(InboundReply {
            reply_text: self.generate(shop_context, raw_history, text).await,
            should_escalate: false,
        })
    }

    /// Build the prompt and call the backend under the reply timeout.
    /// Never fails: backend errors and timeouts yield the fallback reply.
    async fn generate(&self, shop_context: Option<&str>, raw: &[Value], text: &str) -> String {
        let request = build_prompt(
            shop_context,
            raw,
            text,
            self.settings.max_tokens,
            self.settings.temperature,
        );

        match tokio::time::timeout(self.settings.reply_timeout, self.backend.complete(request))
            .await
        {
            Ok(Ok(response)) => response.content,
            Ok(Err(e)) => {
                error!(error = %e, "backend call failed, substituting fallback reply");
                self.settings.fallback_reply.clone()
            }
            Err(_) => {
                error!(
                    timeout_secs = self.settings.reply_timeout.as_secs(),
                    "backend call timed out, substituting fallback reply"
                );
                self.settings.fallback_reply.clone()
            }
        }
    }

    fn key_lock(&self, customer_key: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(customer_key.to_string())
            .or_default()
            .clone()
    }
}
