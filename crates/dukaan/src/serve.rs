// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `dukaan serve` command implementation.
//!
//! Wires configuration into the reply pipeline: SQLite conversation
//! store, Azure OpenAI backend, Twilio WhatsApp outbound channel, and
//! the axum gateway. Supports graceful shutdown via signal handlers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dukaan_assistant::{PipelineSettings, ReplyPipeline};
use dukaan_azure_openai::AzureOpenAiClient;
use dukaan_config::DukaanConfig;
use dukaan_core::{DukaanError, OutboundChannel};
use dukaan_gateway::{GatewayState, ServerConfig};
use dukaan_storage::{Database, SqliteConversationStore};
use dukaan_twilio::TwilioWhatsAppChannel;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Outbound channel used when no Twilio section is configured. Replies
/// still reach HTTP callers; channel delivery is logged and dropped.
struct NullChannel;

#[async_trait]
impl OutboundChannel for NullChannel {
    async fn send_text(&self, to: &str, body: &str) -> Result<Option<String>, DukaanError> {
        info!(to, chars = body.len(), "outbound channel not configured, dropping reply");
        Ok(None)
    }
}

/// Runs the `dukaan serve` command.
pub async fn run_serve(config: DukaanConfig) -> Result<(), DukaanError> {
    init_tracing(&config.assistant.log_level);

    info!("starting dukaan serve");

    let db = Database::open(&config.storage.path).await?;
    let store = Arc::new(SqliteConversationStore::new(db));
    info!(path = %config.storage.path, "conversation store ready");

    let backend = Arc::new(azure_backend(&config)?);
    info!(deployment = backend.deployment(), "chat backend ready");

    let channel: Arc<dyn OutboundChannel> = if config.twilio.is_configured() {
        let twilio = &config.twilio;
        // is_configured() guarantees all three fields.
        let channel = TwilioWhatsAppChannel::new(
            twilio.account_sid.as_deref().unwrap_or_default(),
            twilio.auth_token.as_deref().unwrap_or_default(),
            twilio.whatsapp_from.as_deref().unwrap_or_default(),
        )?;
        info!("twilio whatsapp channel ready");
        Arc::new(channel)
    } else {
        info!("twilio not configured, outbound delivery disabled");
        Arc::new(NullChannel)
    };

    let pipeline = ReplyPipeline::new(
        store.clone(),
        backend,
        channel,
        PipelineSettings {
            shop_id: config.assistant.shop_id.clone(),
            reply_timeout: Duration::from_secs(config.assistant.reply_timeout_secs),
            fallback_reply: config.assistant.fallback_reply.clone(),
            max_tokens: config.azure_openai.max_tokens,
            temperature: config.azure_openai.temperature,
        },
    );

    let state = GatewayState {
        pipeline: Arc::new(pipeline),
        store,
        shop_id: config.assistant.shop_id.clone(),
        shop_context: config.assistant.shop_context.clone(),
    };

    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };

    let cancel = install_signal_handler();

    tokio::select! {
        result = dukaan_gateway::start_server(&server_config, state) => result?,
        _ = cancel.cancelled() => {
            info!("dukaan serve shutdown complete");
        }
    }

    Ok(())
}

/// Builds the Azure OpenAI backend, requiring the section to be complete.
fn azure_backend(config: &DukaanConfig) -> Result<AzureOpenAiClient, DukaanError> {
    let azure = &config.azure_openai;
    let endpoint = azure.endpoint.as_deref().ok_or_else(|| {
        DukaanError::Config("azure_openai.endpoint is required to serve".to_string())
    })?;
    let api_key = azure.api_key.as_deref().ok_or_else(|| {
        DukaanError::Config("azure_openai.api_key is required to serve".to_string())
    })?;
    let deployment = azure.deployment.as_deref().ok_or_else(|| {
        DukaanError::Config("azure_openai.deployment is required to serve".to_string())
    })?;
    AzureOpenAiClient::new(endpoint, api_key, deployment, &azure.api_version)
}

/// Installs signal handlers for SIGTERM and SIGINT.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal
/// is received.
fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm =
                signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

            tokio::select! {
                _ = ctrl_c => {
                    info!("received SIGINT (Ctrl+C), initiating shutdown");
                }
                _ = sigterm.recv() => {
                    info!("received SIGTERM, initiating shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, initiating shutdown");
        }

        token_clone.cancel();
    });

    token
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dukaan={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_channel_reports_no_sid() {
        let channel = NullChannel;
        let sid = channel.send_text("whatsapp:+1", "hello").await.unwrap();
        assert!(sid.is_none());
    }

    #[test]
    fn azure_backend_requires_complete_section() {
        let config = dukaan_config::load_config_from_str("").unwrap();
        let result = azure_backend(&config);
        assert!(matches!(result, Err(DukaanError::Config(_))));
    }

    #[test]
    fn azure_backend_builds_from_complete_section() {
        let config = dukaan_config::load_config_from_str(
            r#"
            [azure_openai]
            endpoint = "https://example.openai.azure.com"
            api_key = "test-key"
            deployment = "gpt-4o"
            "#,
        )
        .unwrap();
        let backend = azure_backend(&config).unwrap();
        assert_eq!(backend.deployment(), "gpt-4o");
    }
}
