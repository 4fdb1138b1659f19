// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Kedai order assistant.
//!
//! This crate provides the adapter traits, the error type and the domain
//! types used throughout the Kedai workspace. Every external integration
//! (language model, shipping provider, store, delivery) is reached through
//! a trait defined here.

pub mod error;
pub mod traits;
pub mod types;

pub use error::KedaiError;
pub use types::{
    AdapterType, Contact, ContactSummary, Conversation, ConversationStatus, CostRequest,
    Direction, HealthStatus, IncomingOutcome, Intent, IntentRecord, Message, MessageId,
    MessageKind, NewIncoming, OrderFields, ParcelWeight, ProviderRequest, ProviderResponse,
    RateOption, Region, RegionLevel, ShippingQuote,
};

pub use traits::{
    ConversationStore, DeliveryAdapter, PluginAdapter, ProviderAdapter, ShippingAdapter,
    StorageAdapter,
};
