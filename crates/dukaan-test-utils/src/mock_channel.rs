// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock outbound channel that records deliveries.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use dukaan_core::{DukaanError, OutboundChannel};

/// One recorded delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub to: String,
    pub body: String,
}

/// A mock outbound channel.
///
/// Records every send for assertions; can be switched into a failing
/// mode to verify that the pipeline treats delivery as best-effort.
pub struct MockChannel {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    fail: Arc<Mutex<bool>>,
}

impl MockChannel {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: Arc::new(Mutex::new(false)),
        }
    }

    /// Make every subsequent send return a channel error.
    pub async fn set_failing(&self, failing: bool) {
        *self.fail.lock().await = failing;
    }

    /// All deliveries recorded so far, in order.
    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OutboundChannel for MockChannel {
    async fn send_text(&self, to: &str, body: &str) -> Result<Option<String>, DukaanError> {
        if *self.fail.lock().await {
            return Err(DukaanError::Channel {
                message: "mock channel failure".into(),
                source: None,
            });
        }
        let mut sent = self.sent.lock().await;
        sent.push(SentMessage {
            to: to.to_string(),
            body: body.to_string(),
        });
        Ok(Some(format!("mock-sid-{}", sent.len())))
    }
}
