// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Dukaan shop assistant.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Dukaan configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DukaanConfig {
    /// Reply pipeline behavior settings.
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Azure OpenAI chat-completions settings.
    #[serde(default)]
    pub azure_openai: AzureOpenAiConfig,

    /// Twilio WhatsApp outbound channel settings.
    #[serde(default)]
    pub twilio: TwilioConfig,

    /// Conversation store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Reply pipeline behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AssistantConfig {
    /// Tenant identifier used to key conversations.
    #[serde(default = "default_shop_id")]
    pub shop_id: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Optional shop context (system prompt). When unset, requests with no
    /// shop binding fall back to the fixed generic string.
    #[serde(default)]
    pub shop_context: Option<String>,

    /// Timeout for one backend completion call, in seconds. Expiry is
    /// treated identically to a backend failure.
    #[serde(default = "default_reply_timeout_secs")]
    pub reply_timeout_secs: u64,

    /// Customer-visible reply substituted when the backend fails.
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            shop_id: default_shop_id(),
            log_level: default_log_level(),
            shop_context: None,
            reply_timeout_secs: default_reply_timeout_secs(),
            fallback_reply: default_fallback_reply(),
        }
    }
}

fn default_shop_id() -> String {
    "default".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_reply_timeout_secs() -> u64 {
    20
}

fn default_fallback_reply() -> String {
    "Sorry, I'm having trouble answering right now. Please try again in a moment.".to_string()
}

/// Azure OpenAI chat-completions configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AzureOpenAiConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// API key. `None` requires the environment variable override.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Deployment name of the chat model.
    #[serde(default)]
    pub deployment: Option<String>,

    /// API version query parameter.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Maximum tokens to generate per reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for AzureOpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            deployment: None,
            api_version: default_api_version(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_api_version() -> String {
    "2024-02-15-preview".to_string()
}

fn default_max_tokens() -> u32 {
    300
}

fn default_temperature() -> f32 {
    0.7
}

/// Twilio WhatsApp outbound channel configuration.
///
/// All three fields must be set together; a partially configured section
/// is a validation error. When the section is absent, outbound delivery
/// is logged and dropped.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TwilioConfig {
    /// Twilio account SID.
    #[serde(default)]
    pub account_sid: Option<String>,

    /// Twilio auth token.
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Sending WhatsApp number; the `whatsapp:` prefix is added if missing.
    #[serde(default)]
    pub whatsapp_from: Option<String>,
}

impl TwilioConfig {
    /// True when every field of the section is set.
    pub fn is_configured(&self) -> bool {
        self.account_sid.is_some() && self.auth_token.is_some() && self.whatsapp_from.is_some()
    }

    /// True when some but not all fields are set.
    pub fn is_partial(&self) -> bool {
        let set = [
            self.account_sid.is_some(),
            self.auth_token.is_some(),
            self.whatsapp_from.is_some(),
        ];
        set.iter().any(|s| *s) && !set.iter().all(|s| *s)
    }
}

/// Conversation store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// SQLite database path. Defaults to `dukaan.db` under the platform
    /// data directory.
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> String {
    dirs::data_dir()
        .map(|d| d.join("dukaan/dukaan.db"))
        .and_then(|p| p.to_str().map(str::to_string))
        .unwrap_or_else(|| "dukaan.db".to_string())
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8321
}
