// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the adapters, the order pipeline and the ingestion controller.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifier assigned by the messaging platform to a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Shipping,
    Storage,
    Delivery,
}

// --- Conversation records ---

/// A customer known to the system, keyed by the channel-assigned wa id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub wa_id: String,
    /// Profile name from the most recent inbound payload, or the wa id.
    pub name: String,
    pub phone: String,
    /// ISO 8601 timestamp of the last inbound or outbound message.
    pub last_interaction: String,
    pub last_message_id: Option<i64>,
    pub created_at: String,
}

/// Lifecycle status of a conversation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConversationStatus {
    Open,
    Closed,
}

/// A thread of messages with one contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub contact_id: i64,
    pub status: ConversationStatus,
    pub started_at: String,
}

/// Whether a message came from the customer or was sent by the assistant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Incoming,
    Outgoing,
}

/// Payload kind of a stored message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKind {
    Text,
    Media,
}

/// A persisted message. Immutable after insert except for `is_read`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    pub contact_id: i64,
    pub direction: Direction,
    pub kind: MessageKind,
    pub text: Option<String>,
    /// Channel message id. Unique when present, absent for some outgoing rows.
    pub wa_message_id: Option<String>,
    pub timestamp: String,
    pub is_read: bool,
}

/// An inbound text message about to be persisted.
#[derive(Debug, Clone)]
pub struct NewIncoming {
    pub conversation_id: i64,
    pub contact_id: i64,
    pub wa_message_id: String,
    pub text: String,
    /// Platform timestamp converted to ISO 8601, if the payload carried one.
    pub timestamp: Option<String>,
}

/// Result of recording an inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum IncomingOutcome {
    /// First delivery of this channel message id.
    Created(Message),
    /// The channel message id was already stored; nothing was written.
    Duplicate,
}

/// Read-side view of a contact for the dashboard listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSummary {
    pub contact: Contact,
    pub last_message: Option<Message>,
    /// Number of INCOMING messages not yet marked read.
    pub unread_count: i64,
}

// --- Intent classification ---

/// What the customer is trying to do.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    Order,
    Chat,
}

/// Order fields extracted from free text. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderFields {
    pub name: Option<String>,
    pub full_address: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub item_count: Option<i64>,
}

/// Output of the intent classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentRecord {
    pub intent: Intent,
    pub order: OrderFields,
}

impl IntentRecord {
    /// The record used whenever classification fails.
    pub fn chat() -> Self {
        Self {
            intent: Intent::Chat,
            order: OrderFields::default(),
        }
    }
}

// --- Shipping ---

/// Administrative level of a region lookup.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RegionLevel {
    Province,
    City,
    District,
}

/// A province, city/regency or district as listed by the shipping provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: i64,
    pub name: String,
}

/// Parcel weight, stored in grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParcelWeight(u32);

impl ParcelWeight {
    pub fn from_grams(grams: u32) -> Self {
        Self(grams)
    }

    /// Weight of `count` items of `unit_grams` each, saturating on overflow.
    pub fn for_items(count: u32, unit_grams: u32) -> Self {
        Self(count.saturating_mul(unit_grams))
    }

    pub fn grams(self) -> u32 {
        self.0
    }

    pub fn kilograms(self) -> f64 {
        f64::from(self.0) / 1000.0
    }
}

/// Parameters of a rate calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct CostRequest {
    pub origin: i64,
    pub destination: i64,
    pub weight: ParcelWeight,
    /// Colon-separated courier codes, e.g. `jne:jnt`.
    pub couriers: String,
}

/// One priced delivery option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateOption {
    pub name: String,
    pub code: String,
    pub service: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub cost: i64,
    /// Estimated delivery time as quoted, e.g. `1-2 day`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub etd: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A fully resolved destination with its rate options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShippingQuote {
    pub province: Region,
    pub city: Region,
    pub district: Region,
    pub weight: ParcelWeight,
    pub rates: Vec<RateOption>,
}

// --- Provider ---

/// A single-prompt completion request to a language model.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub model: String,
    pub prompt: String,
}

/// The text answer of a language model.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub content: String,
    pub model: String,
}
