// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery adapter trait for sending replies back to the customer.

use async_trait::async_trait;

use crate::error::KedaiError;
use crate::traits::adapter::PluginAdapter;
use crate::types::MessageId;

/// Outbound side of the messaging channel.
#[async_trait]
pub trait DeliveryAdapter: PluginAdapter {
    /// Sends a plain text message to the given wa id.
    ///
    /// Returns the platform message id when the platform reports one.
    async fn send_text(&self, to: &str, body: &str) -> Result<Option<MessageId>, KedaiError>;
}
