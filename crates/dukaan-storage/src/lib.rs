// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Dukaan shop assistant.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, and the [`ConversationStore`]
//! implementation the reply pipeline runs against.
//!
//! [`ConversationStore`]: dukaan_core::ConversationStore

pub mod database;
pub mod migrations;
pub mod store;

pub use database::Database;
pub use store::SqliteConversationStore;
