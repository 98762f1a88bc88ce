// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversational reply engine for the Dukaan shop assistant.
//!
//! Three layers, bottom up:
//! - [`normalize`]: raw stored records to canonical turns, plus the
//!   prompt-window and retention bounds;
//! - [`prompt`]: shop context rendering and completion-request assembly;
//! - [`pipeline`]: the end-to-end inbound-message orchestration.

pub mod normalize;
pub mod pipeline;
pub mod prompt;

pub use normalize::{cap_retention, normalize_history, prompt_window, PROMPT_WINDOW, STORE_RETENTION};
pub use pipeline::{PipelineSettings, ReplyPipeline, DEFAULT_FALLBACK_REPLY};
pub use prompt::{build_prompt, shop_context_for, ShopProfile, FALLBACK_SHOP_CONTEXT};
