// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Dukaan integration tests.
//!
//! The pipeline's collaborators are injected trait objects, so tests swap
//! them for the doubles in this crate instead of mutating global state.

pub mod memory_store;
pub mod mock_backend;
pub mod mock_channel;

pub use memory_store::MemoryStore;
pub use mock_backend::MockBackend;
pub use mock_channel::{MockChannel, SentMessage};
