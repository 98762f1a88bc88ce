// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Dukaan shop assistant.
//!
//! Layered TOML + environment configuration via Figment, serde models with
//! compiled defaults, and a semantic validation pass.

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::DukaanConfig;
pub use validation::{validate, ConfigError};

/// Errors from the combined load-and-validate entry point.
#[derive(Debug)]
pub enum LoadError {
    /// Figment extraction failed (parse error, type mismatch, unknown key).
    Extract(figment::Error),
    /// Extraction succeeded but semantic validation failed.
    Invalid(Vec<ConfigError>),
}

/// Load the configuration and run semantic validation.
///
/// The binary calls this once at startup and exits on error.
pub fn load_and_validate() -> Result<DukaanConfig, LoadError> {
    let config = load_config().map_err(LoadError::Extract)?;
    let errors = validate(&config);
    if errors.is_empty() {
        Ok(config)
    } else {
        Err(LoadError::Invalid(errors))
    }
}

/// Print load/validation errors to stderr, one per line.
pub fn render_errors(error: &LoadError) {
    match error {
        LoadError::Extract(e) => eprintln!("dukaan: config error: {e}"),
        LoadError::Invalid(errors) => {
            for e in errors {
                eprintln!("dukaan: config error: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_and_validate_accepts_defaults() {
        // No config file is present in the test environment, so this
        // exercises the compiled defaults end to end.
        let config = load_config_from_str("").unwrap();
        assert!(validate(&config).is_empty());
    }
}
