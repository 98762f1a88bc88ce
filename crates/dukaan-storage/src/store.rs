// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed [`ConversationStore`] implementation.
//!
//! Each conversation is one row keyed by `(shop_id, customer_key)`; the
//! `messages` column holds the raw heterogeneous record array as JSON text,
//! mirroring the document model the pipeline was designed against. The
//! store replaces the whole array on write; retention capping is the
//! pipeline's responsibility.

use async_trait::async_trait;
use dukaan_core::{ConversationStore, DukaanError};
use rusqlite::{params, OptionalExtension};
use serde_json::Value;
use tracing::debug;

use crate::database::{map_tr_err, Database};

/// Conversation store over a [`Database`].
#[derive(Clone)]
pub struct SqliteConversationStore {
    db: Database,
}

impl SqliteConversationStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Returns the underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl ConversationStore for SqliteConversationStore {
    async fn fetch_history(
        &self,
        shop_id: &str,
        customer_key: &str,
    ) -> Result<Vec<Value>, DukaanError> {
        let shop_id = shop_id.to_string();
        let customer_key = customer_key.to_string();

        let raw: Option<String> = self
            .db
            .connection()
            .call(move |conn| {
                let row = conn
                    .query_row(
                        "SELECT messages FROM conversations
                         WHERE shop_id = ?1 AND customer_key = ?2",
                        params![shop_id, customer_key],
                        |row| row.get(0),
                    )
                    .optional()?;
                Ok(row)
            })
            .await
            .map_err(map_tr_err)?;

        match raw {
            // Absence is not an error: a conversation that does not exist
            // yet is an empty history.
            None => Ok(Vec::new()),
            Some(json) => serde_json::from_str(&json).map_err(|e| DukaanError::Storage {
                source: Box::new(e),
            }),
        }
    }

    async fn upsert_conversation(
        &self,
        shop_id: &str,
        customer_key: &str,
        messages: &[Value],
    ) -> Result<(), DukaanError> {
        let json = serde_json::to_string(messages).map_err(|e| DukaanError::Storage {
            source: Box::new(e),
        })?;
        let shop_id = shop_id.to_string();
        let customer_key = customer_key.to_string();
        let now = chrono::Utc::now().to_rfc3339();
        let count = messages.len();

        self.db
            .connection()
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO conversations (shop_id, customer_key, messages, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?4)
                     ON CONFLICT(shop_id, customer_key) DO UPDATE SET
                         messages = excluded.messages,
                         updated_at = excluded.updated_at",
                    params![shop_id, customer_key, json, now],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        debug!(count, "conversation upserted");
        Ok(())
    }
}
