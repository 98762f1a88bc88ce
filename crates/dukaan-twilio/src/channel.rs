// SPDX-FileCopyrightText: 2026 Dukaan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Twilio WhatsApp outbound channel.
//!
//! Provides [`TwilioWhatsAppChannel`], a thin client for the Twilio
//! Messages API implementing [`OutboundChannel`]. Delivery is
//! fire-and-forget from the pipeline's perspective: the pipeline logs a
//! failed send and moves on, it never retries here.

use std::time::Duration;

use async_trait::async_trait;
use dukaan_core::{DukaanError, OutboundChannel};
use serde::Deserialize;
use tracing::debug;

/// Base URL for the Twilio REST API.
const API_BASE_URL: &str = "https://api.twilio.com";

/// Outbound WhatsApp channel over the Twilio Messages API.
#[derive(Debug, Clone)]
pub struct TwilioWhatsAppChannel {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from: String,
    base_url: String,
}

/// Subset of the Messages API response the channel reads.
#[derive(Debug, Deserialize)]
struct MessageCreated {
    sid: String,
}

impl TwilioWhatsAppChannel {
    /// Creates a new channel.
    ///
    /// # Arguments
    /// * `account_sid` - Twilio account SID (also the basic-auth username)
    /// * `auth_token` - Twilio auth token
    /// * `from` - Sending WhatsApp number; `whatsapp:` prefix added if missing
    pub fn new(account_sid: &str, auth_token: &str, from: &str) -> Result<Self, DukaanError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| DukaanError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            account_sid: account_sid.to_string(),
            auth_token: auth_token.to_string(),
            from: with_whatsapp_prefix(from),
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }
}

#[async_trait]
impl OutboundChannel for TwilioWhatsAppChannel {
    async fn send_text(&self, to: &str, body: &str) -> Result<Option<String>, DukaanError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        );
        let to = with_whatsapp_prefix(to);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("From", self.from.as_str()), ("To", to.as_str()), ("Body", body)])
            .send()
            .await
            .map_err(|e| DukaanError::Channel {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DukaanError::Channel {
                message: format!("Twilio API returned {status}: {body}"),
                source: None,
            });
        }

        let created: Option<MessageCreated> = response.json().await.ok();
        let sid = created.map(|c| c.sid);
        debug!(to = %to, sid = ?sid, "whatsapp message delivered");
        Ok(sid)
    }
}

/// Twilio WhatsApp addresses require the `whatsapp:` prefix on both sides.
fn with_whatsapp_prefix(number: &str) -> String {
    if number.starts_with("whatsapp:") {
        number.to_string()
    } else {
        format!("whatsapp:{number}")
    }
}
