// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Azure OpenAI chat-completions API.
//!
//! Provides [`AzureOpenAiClient`] which handles request construction,
//! `api-key` authentication, and transient error retry, and implements
//! [`ChatBackend`] for the reply pipeline.

use std::time::Duration;

use async_trait::async_trait;
use dukaan_core::{ChatBackend, CompletionRequest, CompletionResponse, DukaanError};
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse, WireMessage};

/// HTTP client for Azure OpenAI chat completions.
///
/// Manages authentication headers, connection pooling, and retry logic
/// for transient errors (429, 500, 503). One instance is shared
/// process-wide across concurrent pipeline invocations.
#[derive(Debug, Clone)]
pub struct AzureOpenAiClient {
    client: reqwest::Client,
    /// Full chat-completions URL, deployment and api-version included.
    url: String,
    deployment: String,
    max_retries: u32,
}

impl AzureOpenAiClient {
    /// Creates a new Azure OpenAI client.
    ///
    /// # Arguments
    /// * `endpoint` - Resource endpoint, e.g. `https://my-resource.openai.azure.com`
    /// * `api_key` - API key sent via the `api-key` header
    /// * `deployment` - Chat model deployment name
    /// * `api_version` - API version query parameter
    pub fn new(
        endpoint: &str,
        api_key: &str,
        deployment: &str,
        api_version: &str,
    ) -> Result<Self, DukaanError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "api-key",
            HeaderValue::from_str(api_key)
                .map_err(|e| DukaanError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| DukaanError::Backend {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            endpoint.trim_end_matches('/'),
            deployment,
            api_version
        );

        Ok(Self {
            client,
            url,
            deployment: deployment.to_string(),
            max_retries: 1,
        })
    }

    /// Returns the deployment name this client targets.
    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    /// Overrides the request URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_url(mut self, url: String) -> Self {
        self.url = url;
        self
    }

    /// Sends a chat-completions request and returns the parsed response.
    ///
    /// On transient errors (429, 500, 503), retries once after a 1-second delay.
    async fn request_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, DukaanError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying completion request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&self.url)
                .json(request)
                .send()
                .await
                .map_err(|e| DukaanError::Backend {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "completion response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| DukaanError::Backend {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                return serde_json::from_str(&body).map_err(|e| DukaanError::Backend {
                    message: format!("failed to parse API response: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(DukaanError::Backend {
                    message: format!("API returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            // Non-transient error or exhausted retries.
            let body = response.text().await.unwrap_or_default();
            let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!(
                    "Azure OpenAI error ({}): {}",
                    api_err.error.code.as_deref().unwrap_or("unknown"),
                    api_err.error.message
                )
            } else {
                format!("API returned {status}: {body}")
            };
            return Err(DukaanError::Backend {
                message,
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| DukaanError::Backend {
            message: "completion request failed after retries".into(),
            source: None,
        }))
    }
}

#[async_trait]
impl ChatBackend for AzureOpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, DukaanError> {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(WireMessage::new("system", request.system));
        messages.extend(
            request
                .messages
                .iter()
                .map(|m| WireMessage::new(m.role.as_wire_role(), m.content.clone())),
        );

        let wire_request = ChatCompletionRequest {
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self.request_completion(&wire_request).await?;
        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| DukaanError::Backend {
                message: "completion response contained no reply content".into(),
                source: None,
            })?;

        Ok(CompletionResponse {
            content,
            model: response.model,
        })
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dukaan_core::ChatMessage;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(url: &str) -> AzureOpenAiClient {
        AzureOpenAiClient::new(
            "https://example.openai.azure.com",
            "test-api-key",
            "gpt-4o-mini",
            "2024-02-15-preview",
        )
        .unwrap()
        .with_url(url.to_string())
    }

    fn test_request() -> CompletionRequest {
        CompletionRequest {
            system: "You sell shirts.".into(),
            messages: vec![
                ChatMessage::customer("hi"),
                ChatMessage::customer("price of shirt?"),
            ],
            max_tokens: 300,
            temperature: 0.7,
        }
    }

    fn success_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-test",
            "model": "gpt-4o-mini",
            "choices": [{
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
    }

    #[tokio::test]
    async fn complete_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("Rs. 1500.")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.complete(test_request()).await.unwrap();
        assert_eq!(result.content, "Rs. 1500.");
        assert_eq!(result.model.as_deref(), Some("gpt-4o-mini"));
    }

    #[tokio::test]
    async fn system_entry_precedes_roles_on_the_wire() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("api-key", "test-api-key"))
            .and(body_partial_json(serde_json::json!({
                "messages": [
                    {"role": "system", "content": "You sell shirts."},
                    {"role": "user", "content": "hi"},
                    {"role": "user", "content": "price of shirt?"}
                ],
                "temperature": 0.7,
                "max_tokens": 300
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("ok")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.complete(test_request()).await;
        assert!(result.is_ok(), "wire shape should match: {result:?}");
    }

    #[tokio::test]
    async fn complete_retries_on_429() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {"code": "429", "message": "Rate limited"}
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("after retry")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.complete(test_request()).await.unwrap();
        assert_eq!(result.content, "after retry");
    }

    #[tokio::test]
    async fn complete_fails_on_400() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"code": "BadRequest", "message": "Unknown deployment"}
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.complete(test_request()).await.unwrap_err();
        assert!(err.to_string().contains("BadRequest"), "got: {err}");
    }

    #[tokio::test]
    async fn complete_exhausts_retries_on_503() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": {"code": "503", "message": "Service unavailable"}
            })))
            .expect(2)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.complete(test_request()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn null_content_is_a_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": null}}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.complete(test_request()).await.unwrap_err();
        assert!(err.to_string().contains("no reply content"), "got: {err}");
    }
}
