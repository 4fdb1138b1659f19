// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shipping adapter trait for the geography and rate provider.

use async_trait::async_trait;

use crate::error::KedaiError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CostRequest, RateOption, Region};

/// Adapter for a shipping-rate service that also publishes the authoritative
/// province / city / district lists.
///
/// List methods return regions in provider order; resolvers rely on that
/// order for tie-breaking.
#[async_trait]
pub trait ShippingAdapter: PluginAdapter {
    async fn list_provinces(&self) -> Result<Vec<Region>, KedaiError>;

    async fn list_cities(&self, province_id: i64) -> Result<Vec<Region>, KedaiError>;

    async fn list_districts(&self, city_id: i64) -> Result<Vec<Region>, KedaiError>;

    /// Prices a parcel from `origin` to the `destination` district.
    async fn calculate_cost(&self, request: CostRequest) -> Result<Vec<RateOption>, KedaiError>;
}
