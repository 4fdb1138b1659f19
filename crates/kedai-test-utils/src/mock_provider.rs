// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock language model for deterministic testing.
//!
//! `MockProvider` answers from a FIFO queue of scripted outcomes and records
//! every request it receives, so tests can assert on the prompts built
//! upstream.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use kedai_core::{
    AdapterType, HealthStatus, KedaiError, PluginAdapter, ProviderAdapter, ProviderRequest,
    ProviderResponse,
};

/// A mock provider that returns pre-configured answers.
///
/// When the queue is empty, a default "mock response" text is returned.
pub struct MockProvider {
    responses: Arc<Mutex<VecDeque<Result<String, String>>>>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with an empty response queue.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock provider pre-loaded with the given answers.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into_iter().map(Ok).collect())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue an answer.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.responses.lock().await.push_back(Ok(text.into()));
    }

    /// Queue a provider failure.
    pub async fn add_failure(&self, message: impl Into<String>) {
        self.responses.lock().await.push_back(Err(message.into()));
    }

    /// Every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }

    /// Prompt of the most recent request.
    pub async fn last_prompt(&self) -> Option<String> {
        self.requests.lock().await.last().map(|r| r.prompt.clone())
    }

    async fn next_response(&self) -> Result<String, String> {
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok("mock response".to_string()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
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
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, KedaiError> {
        let model = request.model.clone();
        self.requests.lock().await.push(request);
        match self.next_response().await {
            Ok(content) => Ok(ProviderResponse { content, model }),
            Err(message) => Err(KedaiError::Provider {
                message,
                source: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(prompt: &str) -> ProviderRequest {
        ProviderRequest {
            model: "test-model".to_string(),
            prompt: prompt.to_string(),
        }
    }

    #[tokio::test]
    async fn default_response_when_queue_empty() {
        let provider = MockProvider::new();
        let resp = provider.complete(req("hi")).await.unwrap();
        assert_eq!(resp.content, "mock response");
        assert_eq!(resp.model, "test-model");
    }

    #[tokio::test]
    async fn queued_outcomes_returned_in_order() {
        let provider = MockProvider::with_responses(vec!["first".into()]);
        provider.add_failure("quota exceeded").await;
        provider.add_response("third").await;

        assert_eq!(provider.complete(req("a")).await.unwrap().content, "first");
        assert!(provider.complete(req("b")).await.is_err());
        assert_eq!(provider.complete(req("c")).await.unwrap().content, "third");
        assert_eq!(provider.complete(req("d")).await.unwrap().content, "mock response");
    }

    #[tokio::test]
    async fn records_prompts() {
        let provider = MockProvider::new();
        provider.complete(req("one")).await.unwrap();
        provider.complete(req("two")).await.unwrap();
        assert_eq!(provider.requests().await.len(), 2);
        assert_eq!(provider.last_prompt().await.as_deref(), Some("two"));
    }
}
