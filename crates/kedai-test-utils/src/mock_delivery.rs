// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock delivery adapter capturing outbound messages.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use kedai_core::{
    AdapterType, DeliveryAdapter, HealthStatus, KedaiError, MessageId, PluginAdapter,
};

/// A text message passed to [`DeliveryAdapter::send_text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentText {
    pub to: String,
    pub body: String,
}

/// Captures every send. Can be switched to fail.
pub struct MockDelivery {
    sent: Arc<Mutex<Vec<SentText>>>,
    failing: AtomicBool,
}

impl MockDelivery {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failing: AtomicBool::new(false),
        }
    }

    /// Make subsequent sends return a channel error. Failed sends are still captured.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Get all messages that were sent.
    pub async fn sent_messages(&self) -> Vec<SentText> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

impl Default for MockDelivery {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockDelivery {
    fn name(&self) -> &str {
        "mock-delivery"
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
impl DeliveryAdapter for MockDelivery {
    async fn send_text(&self, to: &str, body: &str) -> Result<Option<MessageId>, KedaiError> {
        let mut sent = self.sent.lock().await;
        sent.push(SentText {
            to: to.to_string(),
            body: body.to_string(),
        });
        if self.failing.load(Ordering::SeqCst) {
            return Err(KedaiError::Channel {
                message: "mock delivery failure".into(),
                source: None,
            });
        }
        Ok(Some(MessageId(format!("wamid.mock.{}", sent.len()))))
    }
}
