// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory conversation store for pipeline tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use dukaan_core::{ConversationStore, DukaanError};

/// HashMap-backed [`ConversationStore`].
///
/// Read and write failures can be injected independently, matching the
/// pipeline's error taxonomy (read errors propagate, "not found" does
/// not exist as a state — missing keys are empty histories).
pub struct MemoryStore {
    conversations: Arc<Mutex<HashMap<(String, String), Vec<Value>>>>,
    fail_reads: Arc<Mutex<bool>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            conversations: Arc::new(Mutex::new(HashMap::new())),
            fail_reads: Arc::new(Mutex::new(false)),
            fail_writes: Arc::new(Mutex::new(false)),
        }
    }

    /// Seed a conversation with raw records.
    pub async fn seed(&self, shop_id: &str, customer_key: &str, messages: Vec<Value>) {
        self.conversations
            .lock()
            .await
            .insert((shop_id.to_string(), customer_key.to_string()), messages);
    }

    /// Make every subsequent read fail.
    pub async fn set_fail_reads(&self, failing: bool) {
        *self.fail_reads.lock().await = failing;
    }

    /// Make every subsequent write fail.
    pub async fn set_fail_writes(&self, failing: bool) {
        *self.fail_writes.lock().await = failing;
    }

    /// Number of writes that have landed.
    pub async fn stored(&self, shop_id: &str, customer_key: &str) -> Vec<Value> {
        self.conversations
            .lock()
            .await
            .get(&(shop_id.to_string(), customer_key.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn fetch_history(
        &self,
        shop_id: &str,
        customer_key: &str,
    ) -> Result<Vec<Value>, DukaanError> {
        if *self.fail_reads.lock().await {
            return Err(DukaanError::Storage {
                source: Box::new(std::io::Error::other("mock read failure")),
            });
        }
        Ok(self.stored(shop_id, customer_key).await)
    }

    async fn upsert_conversation(
        &self,
        shop_id: &str,
        customer_key: &str,
        messages: &[Value],
    ) -> Result<(), DukaanError> {
        if *self.fail_writes.lock().await {
            return Err(DukaanError::Storage {
                source: Box::new(std::io::Error::other("mock write failure")),
            });
        }
        self.conversations.lock().await.insert(
            (shop_id.to_string(), customer_key.to_string()),
            messages.to_vec(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn missing_key_reads_as_empty() {
        let store = MemoryStore::new();
        assert!(store.fetch_history("s", "c").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn seed_then_fetch() {
        let store = MemoryStore::new();
        store
            .seed("s", "c", vec![json!({"role": "user", "content": "hi"})])
            .await;
        let history = store.fetch_history("s", "c").await.unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn injected_read_failure() {
        let store = MemoryStore::new();
        store.set_fail_reads(true).await;
        assert!(store.fetch_history("s", "c").await.is_err());
    }
}
