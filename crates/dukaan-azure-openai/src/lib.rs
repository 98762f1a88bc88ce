// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Azure OpenAI chat-completions backend for the Dukaan shop assistant.

pub mod client;
pub mod types;

pub use client::AzureOpenAiClient;
