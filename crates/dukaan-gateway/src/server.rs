// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use dukaan_assistant::ReplyPipeline;
use dukaan_core::{ConversationStore, DukaanError};
use tower_http::cors::CorsLayer;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The reply pipeline every chat-bearing route runs through.
    pub pipeline: Arc<ReplyPipeline>,
    /// Store read directly by the conversation inspection route.
    pub store: Arc<dyn ConversationStore>,
    /// Tenant the server instance serves.
    pub shop_id: String,
    /// System-prompt context for this shop, if configured.
    pub shop_context: Option<String>,
}

/// Gateway server configuration (mirrors GatewayConfig from dukaan-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Builds the full route table. Split out from [`start_server`] so tests
/// can drive the router without binding a socket.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/v1/chat", post(handlers::post_chat))
        .route("/webhook/whatsapp", post(handlers::post_whatsapp_webhook))
        .route(
            "/v1/conversations/{customer_key}",
            get(handlers::get_conversation),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the gateway HTTP server.
///
/// Binds to the configured host:port and serves routes:
/// - POST /v1/chat
/// - POST /webhook/whatsapp
/// - GET /v1/conversations/{customer_key}
/// - GET /health
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), DukaanError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| DukaanError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| DukaanError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dukaan_assistant::PipelineSettings;
    use dukaan_test_utils::{MemoryStore, MockBackend, MockChannel};

    #[test]
    fn gateway_state_is_clone() {
        let store = Arc::new(MemoryStore::new());
        let pipeline = ReplyPipeline::new(
            store.clone(),
            Arc::new(MockBackend::new()),
            Arc::new(MockChannel::new()),
            PipelineSettings::default(),
        );
        let state = GatewayState {
            pipeline: Arc::new(pipeline),
            store,
            shop_id: "default".to_string(),
            shop_context: None,
        };
        let _cloned = state.clone();
    }

    #[test]
    fn server_config_debug() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8321,
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("127.0.0.1"));
    }
}
