// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Handles POST /v1/chat, POST /webhook/whatsapp,
//! GET /v1/conversations/{customer_key}, GET /health.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use dukaan_core::{DukaanError, ReplyOutcome};

use crate::server::GatewayState;

/// Request body for POST /v1/chat.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Customer key the conversation is filed under.
    pub customer_id: String,
    /// The inbound message text.
    pub message: String,
    /// Optional inline history. When present it replaces the stored
    /// conversation for prompt construction and nothing is persisted.
    #[serde(default)]
    pub conversation_history: Option<Vec<Value>>,
}

/// Response body for POST /v1/chat.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// Assistant reply text.
    pub response: String,
    /// Whether the conversation should be handed to a human.
    pub should_escalate: bool,
}

/// Form payload Twilio posts to POST /webhook/whatsapp.
#[derive(Debug, Deserialize)]
pub struct WhatsAppForm {
    /// Message text; Twilio omits it for non-text media.
    #[serde(rename = "Body", default)]
    pub body: String,
    /// Sender address, e.g. "whatsapp:+923001234567".
    #[serde(rename = "From", default)]
    pub from: String,
}

/// Webhook acknowledgement body.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// "ok" or "no message".
    pub status: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// POST /v1/chat
///
/// Runs the reply pipeline for one message. With inline history the
/// call is stateless; without it the stored conversation is read,
/// extended and delivered like any other inbound message.
pub async fn post_chat(
    State(state): State<GatewayState>,
    Json(body): Json<ChatRequest>,
) -> Response {
    let context = state.shop_context.as_deref();

    let outcome = match body.conversation_history {
        Some(history) => Ok(state
            .pipeline
            .generate_reply(context, &history, &body.message)
            .await),
        None => {
            state
                .pipeline
                .handle_inbound(context, &body.customer_id, &body.message)
                .await
        }
    };

    match outcome {
        Ok(ReplyOutcome::Replied(reply)) => (
            StatusCode::OK,
            Json(ChatResponse {
                response: reply.reply_text,
                should_escalate: reply.should_escalate,
            }),
        )
            .into_response(),
        Ok(ReplyOutcome::Ignored) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "message must not be empty".to_string(),
            }),
        )
            .into_response(),
        Err(e) => internal_error(&e),
    }
}

/// POST /webhook/whatsapp
///
/// Twilio inbound-message webhook. An empty body acknowledges without
/// running the pipeline; the reply itself travels over the outbound
/// channel, not this response.
pub async fn post_whatsapp_webhook(
    State(state): State<GatewayState>,
    Form(form): Form<WhatsAppForm>,
) -> Response {
    if form.body.trim().is_empty() {
        return Json(WebhookResponse {
            status: "no message".to_string(),
        })
        .into_response();
    }

    let context = state.shop_context.as_deref();
    match state
        .pipeline
        .handle_inbound(context, &form.from, &form.body)
        .await
    {
        Ok(_) => Json(WebhookResponse {
            status: "ok".to_string(),
        })
        .into_response(),
        Err(e) => internal_error(&e),
    }
}

/// GET /v1/conversations/{customer_key}
///
/// Returns the stored raw message array; an unknown key reads as empty.
pub async fn get_conversation(
    State(state): State<GatewayState>,
    Path(customer_key): Path<String>,
) -> Response {
    match state.store.fetch_history(&state.shop_id, &customer_key).await {
        Ok(messages) => (StatusCode::OK, Json(messages)).into_response(),
        Err(e) => internal_error(&e),
    }
}

/// GET /health
///
/// Unauthenticated liveness probe.
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn internal_error(e: &DukaanError) -> Response {
    tracing::error!(error = %e, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "internal error".to_string(),
        }),
    )
        .into_response()
}
