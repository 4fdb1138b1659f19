// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Kedai integration tests.
//!
//! # Components
//!
//! - [`MockProvider`] - scripted language model that records prompts
//! - [`MockShipping`] - fixture geography and rates with call counters
//! - [`MockDelivery`] - captures outbound texts
//! - [`TestHarness`] - temp SQLite store wired to an event bus

pub mod harness;
pub mod mock_delivery;
pub mod mock_provider;
pub mod mock_shipping;

pub use harness::TestHarness;
pub use mock_delivery::{MockDelivery, SentText};
pub use mock_provider::MockProvider;
pub use mock_shipping::{MockShipping, ShippingCall};
