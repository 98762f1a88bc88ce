// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic validation applied after Figment extraction.
//!
//! Type errors are caught by serde; this layer checks cross-field rules
//! that serde cannot express.

use thiserror::Error;

use crate::model::DukaanConfig;

/// A single semantic validation failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("assistant.reply_timeout_secs must be greater than zero")]
    ZeroReplyTimeout,

    #[error("assistant.fallback_reply must not be empty")]
    EmptyFallbackReply,

    #[error("assistant.log_level must be one of trace, debug, info, warn, error (got {0:?})")]
    InvalidLogLevel(String),

    #[error("azure_openai.max_tokens must be greater than zero")]
    ZeroMaxTokens,

    #[error("azure_openai.temperature must be within 0.0..=2.0 (got {0})")]
    TemperatureOutOfRange(String),

    #[error("twilio section is partially configured: set account_sid, auth_token and whatsapp_from together")]
    PartialTwilio,

    #[error("storage.path must not be empty")]
    EmptyStoragePath,
}

/// Validate a config, returning every violation rather than the first.
pub fn validate(config: &DukaanConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if config.assistant.reply_timeout_secs == 0 {
        errors.push(ConfigError::ZeroReplyTimeout);
    }
    if config.assistant.fallback_reply.trim().is_empty() {
        errors.push(ConfigError::EmptyFallbackReply);
    }
    if !matches!(
        config.assistant.log_level.as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    ) {
        errors.push(ConfigError::InvalidLogLevel(
            config.assistant.log_level.clone(),
        ));
    }

    if config.azure_openai.max_tokens == 0 {
        errors.push(ConfigError::ZeroMaxTokens);
    }
    if !(0.0..=2.0).contains(&config.azure_openai.temperature) {
        errors.push(ConfigError::TemperatureOutOfRange(
            config.azure_openai.temperature.to_string(),
        ));
    }

    if config.twilio.is_partial() {
        errors.push(ConfigError::PartialTwilio);
    }

    if config.storage.path.trim().is_empty() {
        errors.push(ConfigError::EmptyStoragePath);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    #[test]
    fn default_config_is_valid() {
        let config = DukaanConfig::default();
        assert!(validate(&config).is_empty());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = load_config_from_str("[assistant]\nreply_timeout_secs = 0").unwrap();
        assert!(validate(&config).contains(&ConfigError::ZeroReplyTimeout));
    }

    #[test]
    fn out_of_range_temperature_rejected() {
        let config = load_config_from_str("[azure_openai]\ntemperature = 3.5").unwrap();
        let errors = validate(&config);
        assert!(matches!(
            errors.as_slice(),
            [ConfigError::TemperatureOutOfRange(_)]
        ));
    }

    #[test]
    fn partial_twilio_rejected_full_accepted() {
        let partial = load_config_from_str("[twilio]\naccount_sid = \"AC1\"").unwrap();
        assert!(validate(&partial).contains(&ConfigError::PartialTwilio));

        let full = load_config_from_str(
            r#"
            [twilio]
            account_sid = "AC1"
            auth_token = "tok"
            whatsapp_from = "+14155238886"
            "#,
        )
        .unwrap();
        assert!(validate(&full).is_empty());
    }

    #[test]
    fn multiple_violations_all_reported() {
        let config = load_config_from_str(
            r#"
            [assistant]
            reply_timeout_secs = 0
            fallback_reply = ""
            "#,
        )
        .unwrap();
        let errors = validate(&config);
        assert!(errors.contains(&ConfigError::ZeroReplyTimeout));
        assert!(errors.contains(&ConfigError::EmptyFallbackReply));
    }
}
