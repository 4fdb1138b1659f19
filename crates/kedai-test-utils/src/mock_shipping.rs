// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory shipping provider with call counters.
//!
//! [`MockShipping::fixture`] serves a small slice of Indonesian geography
//! (Banten → Cilegon → Cibeber and neighbours) plus two JNE/J&T rates.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use kedai_core::{
    AdapterType, CostRequest, HealthStatus, KedaiError, PluginAdapter, RateOption, Region,
    ShippingAdapter,
};

pub const BANTEN_ID: i64 = 3;
pub const CILEGON_ID: i64 = 106;
pub const CIBEBER_ID: i64 = 1432;

/// Which operation to count or break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShippingCall {
    Provinces,
    Cities,
    Districts,
    Cost,
}

impl ShippingCall {
    fn slot(self) -> usize {
        match self {
            ShippingCall::Provinces => 0,
            ShippingCall::Cities => 1,
            ShippingCall::Districts => 2,
            ShippingCall::Cost => 3,
        }
    }
}

pub struct MockShipping {
    provinces: Vec<Region>,
    cities: HashMap<i64, Vec<Region>>,
    districts: HashMap<i64, Vec<Region>>,
    rates: Vec<RateOption>,
    calls: [AtomicUsize; 4],
    failing: [AtomicBool; 4],
    last_cost: Mutex<Option<CostRequest>>,
}

pub fn region(id: i64, name: &str) -> Region {
    Region {
        id,
        name: name.to_string(),
    }
}

fn rate(name: &str, code: &str, service: &str, cost: i64, etd: &str) -> RateOption {
    RateOption {
        name: name.to_string(),
        code: code.to_string(),
        service: service.to_string(),
        description: format!("{service} service"),
        cost,
        etd: etd.to_string(),
    }
}

impl MockShipping {
    /// Empty provider: every list is empty, no rates.
    pub fn empty() -> Self {
        Self {
            provinces: Vec::new(),
            cities: HashMap::new(),
            districts: HashMap::new(),
            rates: Vec::new(),
            calls: Default::default(),
            failing: Default::default(),
            last_cost: Mutex::new(None),
        }
    }

    pub fn fixture() -> Self {
        let mut cities = HashMap::new();
        cities.insert(
            BANTEN_ID,
            vec![
                region(CILEGON_ID, "CILEGON"),
                region(402, "SERANG"),
                region(455, "TANGERANG"),
            ],
        );
        cities.insert(9, vec![region(23, "BANDUNG"), region(79, "BOGOR")]);

        let mut districts = HashMap::new();
        districts.insert(
            CILEGON_ID,
            vec![
                region(CIBEBER_ID, "CIBEBER"),
                region(1433, "CIWANDAN"),
                region(1434, "CITANGKIL"),
            ],
        );

        Self {
            provinces: vec![
                region(BANTEN_ID, "BANTEN"),
                region(9, "JAWA BARAT"),
                region(6, "DKI JAKARTA"),
            ],
            cities,
            districts,
            rates: vec![
                rate("Jalur Nugraha Ekakurir (JNE)", "jne", "REG", 11000, "1-2 day"),
                rate("J&T Express", "jnt", "EZ", 12000, "2-3 day"),
            ],
            ..Self::empty()
        }
    }

    /// Replace the district list of one city.
    pub fn with_districts(mut self, city_id: i64, districts: Vec<Region>) -> Self {
        self.districts.insert(city_id, districts);
        self
    }

    /// Make one operation fail with a shipping error.
    pub fn fail(&self, call: ShippingCall) {
        self.failing[call.slot()].store(true, Ordering::SeqCst);
    }

    /// Number of times an operation was invoked.
    pub fn calls(&self, call: ShippingCall) -> usize {
        self.calls[call.slot()].load(Ordering::SeqCst)
    }

    /// The most recent cost request.
    pub fn last_cost_request(&self) -> Option<CostRequest> {
        self.last_cost.lock().ok().and_then(|guard| guard.clone())
    }

    fn enter(&self, call: ShippingCall) -> Result<(), KedaiError> {
        self.calls[call.slot()].fetch_add(1, Ordering::SeqCst);
        if self.failing[call.slot()].load(Ordering::SeqCst) {
            return Err(KedaiError::Shipping {
                message: format!("mock {call:?} failure"),
                source: None,
            });
        }
        Ok(())
    }
}

impl Default for MockShipping {
    fn default() -> Self {
        Self::fixture()
    }
}

#[async_trait]
impl PluginAdapter for MockShipping {
    fn name(&self) -> &str {
        "mock-shipping"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Shipping
    }

    async fn health_check(&self) -> Result<HealthStatus, KedaiError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), KedaiError> {
        Ok(())
    }
}

#[async_trait]
impl ShippingAdapter for MockShipping {
    async fn list_provinces(&self) -> Result<Vec<Region>, KedaiError> {
        self.enter(ShippingCall::Provinces)?;
        Ok(self.provinces.clone())
    }

    async fn list_cities(&self, province_id: i64) -> Result<Vec<Region>, KedaiError> {
        self.enter(ShippingCall::Cities)?;
        Ok(self.cities.get(&province_id).cloned().unwrap_or_default())
    }

    async fn list_districts(&self, city_id: i64) -> Result<Vec<Region>, KedaiError> {
        self.enter(ShippingCall::Districts)?;
        Ok(self.districts.get(&city_id).cloned().unwrap_or_default())
    }

    async fn calculate_cost(&self, request: CostRequest) -> Result<Vec<RateOption>, KedaiError> {
        if let Ok(mut last) = self.last_cost.lock() {
            *last = Some(request);
        }
        self.enter(ShippingCall::Cost)?;
        Ok(self.rates.clone())
    }
}
