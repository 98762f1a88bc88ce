// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./dukaan.toml` > `~/.config/dukaan/dukaan.toml` > `/etc/dukaan/dukaan.toml`
//! with environment variable overrides via `DUKAAN_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::DukaanConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/dukaan/dukaan.toml` (system-wide)
/// 3. `~/.config/dukaan/dukaan.toml` (user XDG config)
/// 4. `./dukaan.toml` (local directory)
/// 5. `DUKAAN_*` environment variables
pub fn load_config() -> Result<DukaanConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DukaanConfig::default()))
        .merge(Toml::file("/etc/dukaan/dukaan.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("dukaan/dukaan.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("dukaan.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<DukaanConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DukaanConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<DukaanConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DukaanConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `DUKAAN_TWILIO_ACCOUNT_SID`
/// must map to `twilio.account_sid`, not `twilio.account.sid`.
fn env_provider() -> Env {
    Env::prefixed("DUKAAN_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: DUKAAN_AZURE_OPENAI_API_KEY -> "azure_openai_api_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("assistant_", "assistant.", 1)
            .replacen("azure_openai_", "azure_openai.", 1)
            .replacen("twilio_", "twilio.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("gateway_", "gateway.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_any_file() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.assistant.shop_id, "default");
        assert_eq!(config.assistant.reply_timeout_secs, 20);
        assert_eq!(config.azure_openai.max_tokens, 300);
        assert_eq!(config.gateway.port, 8321);
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = load_config_from_str(
            r#"
            [assistant]
            shop_id = "karimabad-store"
            reply_timeout_secs = 10

            [azure_openai]
            endpoint = "https://example.openai.azure.com"
            deployment = "gpt-4o-mini"
            "#,
        )
        .unwrap();
        assert_eq!(config.assistant.shop_id, "karimabad-store");
        assert_eq!(config.assistant.reply_timeout_secs, 10);
        assert_eq!(
            config.azure_openai.endpoint.as_deref(),
            Some("https://example.openai.azure.com")
        );
        // Untouched sections keep their defaults.
        assert_eq!(config.azure_openai.temperature, 0.7);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = load_config_from_str(
            r#"
            [assistant]
            shopid = "typo"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn partial_twilio_section_detected() {
        let config = load_config_from_str(
            r#"
            [twilio]
            account_sid = "AC123"
            "#,
        )
        .unwrap();
        assert!(config.twilio.is_partial());
        assert!(!config.twilio.is_configured());
    }
}
