// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits for the pipeline's external collaborators.

pub mod backend;
pub mod channel;
pub mod store;

pub use backend::ChatBackend;
pub use channel::OutboundChannel;
pub use store::ConversationStore;
