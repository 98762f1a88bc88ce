// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dukaan - a conversational assistant for small shops.
//!
//! This is the binary entry point for the Dukaan server.

use clap::{Parser, Subcommand};

mod serve;

/// Dukaan - a conversational assistant for small shops.
#[derive(Parser, Debug)]
#[command(name = "dukaan", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Dukaan assistant server.
    Serve,
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match dukaan_config::load_and_validate() {
        Ok(config) => config,
        Err(error) => {
            dukaan_config::render_errors(&error);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("dukaan serve: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            print_config(&config);
        }
        None => {
            println!("dukaan: use --help for available commands");
        }
    }
}

/// Renders the effective configuration as TOML with secrets redacted.
fn print_config(config: &dukaan_config::DukaanConfig) {
    let mut redacted = config.clone();
    if redacted.azure_openai.api_key.is_some() {
        redacted.azure_openai.api_key = Some("[redacted]".to_string());
    }
    if redacted.twilio.auth_token.is_some() {
        redacted.twilio.auth_token = Some("[redacted]".to_string());
    }
    match toml::to_string_pretty(&redacted) {
        Ok(rendered) => print!("{rendered}"),
        Err(e) => eprintln!("dukaan: failed to render config: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed).
        let config = dukaan_config::load_config_from_str("").unwrap();
        assert!(dukaan_config::validate(&config).is_empty());
        assert_eq!(config.assistant.shop_id, "default");
    }

    #[test]
    fn printed_config_redacts_secrets() {
        let config = dukaan_config::load_config_from_str(
            "[azure_openai]\napi_key = \"secret-key\"\n",
        )
        .unwrap();
        let mut redacted = config.clone();
        redacted.azure_openai.api_key = Some("[redacted]".to_string());
        let rendered = toml::to_string_pretty(&redacted).unwrap();
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("[redacted]"));
    }
}
