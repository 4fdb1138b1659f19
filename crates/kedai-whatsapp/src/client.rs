// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound text delivery through the Graph API.

use std::time::Duration;

use async_trait::async_trait;
use kedai_config::model::WhatsAppConfig;
use kedai_core::{AdapterType, DeliveryAdapter, HealthStatus, KedaiError, MessageId, PluginAdapter};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct SendTextRequest<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    text: TextPayload<'a>,
}

#[derive(Debug, Serialize)]
struct TextPayload<'a> {
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendTextResponse {
    #[serde(default)]
    messages: Vec<SentMessage>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    id: String,
}

/// Sends text messages from the configured business phone number.
#[derive(Debug, Clone)]
pub struct WhatsAppClient {
    client: reqwest::Client,
    messages_url: String,
    timeout: Duration,
}

impl WhatsAppClient {
    /// Requires `access_token` and `phone_number_id`.
    pub fn new(config: &WhatsAppConfig) -> Result<Self, KedaiError> {
        let token = config
            .access_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| KedaiError::Config("whatsapp.access_token is not set".into()))?;
        let phone_number_id = config
            .phone_number_id
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| KedaiError::Config("whatsapp.phone_number_id is not set".into()))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                KedaiError::Config(format!("invalid access token header value: {e}"))
            })?,
        );

        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| KedaiError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            messages_url: format!(
                "{}/{}/{phone_number_id}/messages",
                config.api_base_url.trim_end_matches('/'),
                config.api_version
            ),
            timeout,
        })
    }

    pub fn messages_url(&self) -> &str {
        &self.messages_url
    }
}

#[async_trait]
impl PluginAdapter for WhatsAppClient {
    fn name(&self) -> &str {
        "whatsapp"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Delivery
    }

    async fn health_check(&self) -> Result<HealthStatus, KedaiError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), KedaiError> {
        Ok(())
    }
}

#[async_trait]
impl DeliveryAdapter for WhatsAppClient {
    async fn send_text(&self, to: &str, body: &str) -> Result<Option<MessageId>, KedaiError> {
        let request = SendTextRequest {
            messaging_product: "whatsapp",
            to,
            kind: "text",
            text: TextPayload { body },
        };

        let response = self
            .client
            .post(&self.messages_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    KedaiError::Timeout {
                        duration: self.timeout,
                    }
                } else {
                    KedaiError::Channel {
                        message: format!("HTTP request failed: {e}"),
                        source: Some(Box::new(e)),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "WhatsApp send rejected");
            return Err(KedaiError::Channel {
                message: format!("Graph API returned {status}: {body}"),
                source: None,
            });
        }

        let parsed: Option<SendTextResponse> = response.json().await.ok();
        let id = parsed
            .and_then(|r| r.messages.into_iter().next())
            .map(|m| MessageId(m.id));
        debug!(to, id = ?id, "WhatsApp text sent");
        Ok(id)
    }
}
