// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini provider adapter for Kedai.
//!
//! Implements [`ProviderAdapter`] over the `generateContent` endpoint. Every
//! request is a single user turn; the caller builds the whole prompt.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use kedai_config::model::GeminiConfig;
use kedai_core::{
    AdapterType, HealthStatus, KedaiError, PluginAdapter, ProviderAdapter, ProviderRequest,
    ProviderResponse,
};
use tracing::{debug, info, warn};

use crate::client::GeminiClient;
use crate::types::GenerateContentRequest;

/// Gemini provider implementing [`ProviderAdapter`].
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    /// Creates a provider from the `[gemini]` config section.
    ///
    /// Fails when `gemini.api_key` is not set.
    pub fn new(config: &GeminiConfig) -> Result<Self, KedaiError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| KedaiError::Config("gemini.api_key is not set".into()))?;

        let client = GeminiClient::new(
            api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;

        info!(
            classifier_model = %config.classifier_model,
            reply_model = %config.reply_model,
            "Gemini provider initialized"
        );
        Ok(Self { client })
    }

    /// Creates a provider with an existing client (for testing).
    pub fn with_client(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, KedaiError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), KedaiError> {
        debug!("Gemini provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for GeminiProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, KedaiError> {
        let body = GenerateContentRequest::from_prompt(&request.prompt);
        let response = self.client.generate_content(&request.model, &body).await?;

        let content = match response.text() {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                let reason = response
                    .candidates
                    .first()
                    .and_then(|c| c.finish_reason.clone())
                    .unwrap_or_else(|| "no candidates".to_string());
                warn!(model = %request.model, reason = %reason, "Gemini returned no text");
                return Err(KedaiError::Provider {
                    message: format!("empty response ({reason})"),
                    source: None,
                });
            }
        };

        Ok(ProviderResponse {
            content,
            model: response.model_version.unwrap_or(request.model),
        })
    }
}
