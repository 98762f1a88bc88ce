// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound messaging channel trait.

use async_trait::async_trait;

use crate::error::DukaanError;

/// Delivers a text reply to a customer over some messaging transport.
///
/// Delivery is fire-and-forget from the pipeline's perspective: a failed
/// send is logged by the caller, never retried, and never rolls back the
/// store write that preceded it.
#[async_trait]
pub trait OutboundChannel: Send + Sync + 'static {
    /// Sends `body` to the address `to`. Returns an opaque delivery id
    /// when the transport reports one.
    async fn send_text(&self, to: &str, body: &str) -> Result<Option<String>, DukaanError>;
}
