// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;

use dukaan_core::DukaanError;
use tokio_rusqlite::Connection;
use tracing::debug;

/// Handle to the SQLite database behind the conversation store.
///
/// Wraps a single `tokio_rusqlite::Connection`; all query code accepts
/// `&Database` and calls through `connection().call()`, which serializes
/// every closure on one background thread and eliminates SQLITE_BUSY
/// errors under concurrent access.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) the database at `path`, applies PRAGMAs, and
    /// runs pending migrations.
    pub async fn open(path: &str) -> Result<Self, DukaanError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| DukaanError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        let conn = Connection::open(path).await.map_err(|e| DukaanError::Storage {
            source: Box::new(e),
        })?;

        let setup: Result<(), DukaanError> = conn
            .call(|conn| {
                conn.pragma_update(None, "journal_mode", "WAL")?;
                conn.pragma_update(None, "synchronous", "NORMAL")?;
                conn.pragma_update(None, "foreign_keys", "ON")?;
                Ok(crate::migrations::run_migrations(conn))
            })
            .await
            .map_err(map_tr_err)?;
        setup?;

        debug!(path, "database opened");
        Ok(Self { conn })
    }

    /// Returns the underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Closes the database, flushing pending writes.
    pub async fn close(&self) -> Result<(), DukaanError> {
        self.conn.clone().close().await.map_err(map_tr_err)
    }
}

/// Maps a tokio-rusqlite error into the storage error variant.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> DukaanError {
    DukaanError::Storage {
        source: Box::new(e),
    }
}
