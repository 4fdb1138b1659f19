// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for hosted language models.

use async_trait::async_trait;

use crate::error::KedaiError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ProviderRequest, ProviderResponse};

/// Adapter for a hosted language model used both for structured extraction
/// and for reply generation.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends a single prompt and returns the full text answer.
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, KedaiError>;
}
