// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Dukaan shop assistant.
//!
//! Exposes the reply pipeline over REST: a JSON chat route for dashboard
//! clients, the Twilio WhatsApp webhook, a conversation inspection route
//! and a liveness probe. All chat-bearing routes share one
//! [`ReplyPipeline`](dukaan_assistant::ReplyPipeline) via
//! [`GatewayState`](server::GatewayState).

pub mod handlers;
pub mod server;

pub use server::{router, start_server, GatewayState, ServerConfig};
