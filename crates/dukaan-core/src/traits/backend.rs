// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Language-model backend trait.

use async_trait::async_trait;

use crate::error::DukaanError;
use crate::types::{CompletionRequest, CompletionResponse};

/// A request/response text-completion capability.
///
/// Given a prompt (system context + history + new message) the backend
/// returns one reply string, or fails. Implementations are shared
/// process-wide and must be safe for concurrent use; the pipeline owns
/// the timeout and failure policy around each call.
#[async_trait]
pub trait ChatBackend: Send + Sync + 'static {
    /// Sends a completion request and returns the full response.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, DukaanError>;
}
