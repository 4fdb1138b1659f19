// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shipping quotes for free-text destinations.

use std::sync::Arc;

use kedai_config::model::ShippingConfig;
use kedai_core::{CostRequest, ParcelWeight, RegionLevel, ShippingAdapter, ShippingQuote};
use tracing::{info, warn};

use crate::resolver::{RegionResolver, ResolveError};

/// Why a quote could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    /// A region level did not match any candidate.
    #[error("{level} not recognised: {query:?}")]
    RegionNotFound { level: RegionLevel, query: String },

    /// The provider failed while listing regions or pricing the parcel.
    #[error("shipping rate service unavailable: {reason}")]
    RateServiceUnavailable { reason: String },
}

impl From<ResolveError> for QuoteError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NotFound { level, query } => QuoteError::RegionNotFound { level, query },
            ResolveError::Provider { level, source } => QuoteError::RateServiceUnavailable {
                reason: format!("{level} list: {source}"),
            },
        }
    }
}

/// Resolves a destination and prices a parcel from the configured origin.
#[derive(Clone)]
pub struct QuoteService {
    resolver: RegionResolver,
    shipping: Arc<dyn ShippingAdapter>,
    origin: i64,
    couriers: String,
}

impl QuoteService {
    pub fn new(shipping: Arc<dyn ShippingAdapter>, origin: i64, couriers: impl Into<String>) -> Self {
        Self {
            resolver: RegionResolver::new(shipping.clone()),
            shipping,
            origin,
            couriers: couriers.into(),
        }
    }

    pub fn from_config(shipping: Arc<dyn ShippingAdapter>, config: &ShippingConfig) -> Self {
        Self::new(shipping, config.origin_id, config.couriers.clone())
    }

    /// Resolve province, city and district in order, then price the parcel.
    ///
    /// Stops at the first level that fails; later levels and the rate
    /// endpoint are not called. Never retries.
    pub async fn quote(
        &self,
        province: &str,
        city: &str,
        district: &str,
        weight: ParcelWeight,
    ) -> Result<ShippingQuote, QuoteError> {
        let province = self.resolver.resolve_province(province).await?;
        let city = self.resolver.resolve_city(province.id, city).await?;
        let district = self.resolver.resolve_district(city.id, district).await?;

        let request = CostRequest {
            origin: self.origin,
            destination: district.id,
            weight,
            couriers: self.couriers.clone(),
        };
        let rates = self.shipping.calculate_cost(request).await.map_err(|e| {
            warn!(destination = district.id, error = %e, "rate calculation failed");
            QuoteError::RateServiceUnavailable {
                reason: e.to_string(),
            }
        })?;

        info!(
            destination = district.id,
            grams = weight.grams(),
            options = rates.len(),
            "shipping quote ready"
        );
        Ok(ShippingQuote {
            province,
            city,
            district,
            weight,
            rates,
        })
    }
}
