// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock language-model backend for deterministic testing.
//!
//! `MockBackend` implements `ChatBackend` with pre-configured replies,
//! enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use dukaan_core::{ChatBackend, CompletionRequest, CompletionResponse, DukaanError};

/// A mock backend that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue; when the queue is empty, a
/// default "mock reply" text is returned. Failure and latency can be
/// injected per instance.
pub struct MockBackend {
    replies: Arc<Mutex<VecDeque<String>>>,
    /// Requests seen, recorded for assertions.
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    fail: Arc<Mutex<bool>>,
    delay: Arc<Mutex<Option<Duration>>>,
}

impl MockBackend {
    /// Create a new mock backend with an empty reply queue.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            fail: Arc::new(Mutex::new(false)),
            delay: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a mock backend pre-loaded with the given replies.
    pub fn with_replies(replies: Vec<String>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from(replies))),
            requests: Arc::new(Mutex::new(Vec::new())),
            fail: Arc::new(Mutex::new(false)),
            delay: Arc::new(Mutex::new(None)),
        }
    }

    /// Add a reply to the end of the queue.
    pub async fn add_reply(&self, text: String) {
        self.replies.lock().await.push_back(text);
    }

    /// Make every subsequent call return a backend error.
    pub async fn set_failing(&self, failing: bool) {
        *self.fail.lock().await = failing;
    }

    /// Delay every subsequent call by `delay` before responding, to
    /// exercise the pipeline's timeout handling.
    pub async fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().await = delay;
    }

    /// Number of completion calls received.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// All requests received so far, in order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    async fn next_reply(&self) -> String {
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| "mock reply".to_string())
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, DukaanError> {
        self.requests.lock().await.push(request);

        if let Some(delay) = *self.delay.lock().await {
            tokio::time::sleep(delay).await;
        }

        if *self.fail.lock().await {
            return Err(DukaanError::Backend {
                message: "mock backend failure".into(),
                source: None,
            });
        }

        Ok(CompletionResponse {
            content: self.next_reply().await,
            model: Some("mock-model".into()),
        })
    }
}
