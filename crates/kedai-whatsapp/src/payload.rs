// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp Cloud API webhook payload.
//!
//! Only the parts needed to extract inbound text messages are modelled.
//! Everything is optional so that status callbacks and unfamiliar shapes
//! deserialize instead of failing.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub value: Option<ChangeValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub contacts: Vec<WaContact>,
    #[serde(default)]
    pub messages: Vec<WaMessage>,
    #[serde(default)]
    pub statuses: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WaContact {
    #[serde(default)]
    pub wa_id: String,
    #[serde(default)]
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WaMessage {
    pub from: String,
    pub id: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<TextBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextBody {
    #[serde(default)]
    pub body: String,
}

/// One inbound text message ready for ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundText {
    pub wa_id: String,
    pub profile_name: Option<String>,
    pub message_id: String,
    /// Trimmed, never empty.
    pub text: String,
    /// Unix seconds as sent by the platform.
    pub timestamp: Option<String>,
}

impl WebhookPayload {
    /// Parses a raw body. `None` for non-JSON bodies or a missing `object`.
    pub fn parse(raw: &[u8]) -> Option<Self> {
        let payload: WebhookPayload = serde_json::from_slice(raw).ok()?;
        payload.object.as_ref()?;
        Some(payload)
    }

    /// Every non-empty text message in payload order.
    pub fn text_messages(&self) -> Vec<InboundText> {
        let mut out = Vec::new();
        for change in self.entry.iter().flat_map(|e| &e.changes) {
            let Some(value) = &change.value else {
                continue;
            };
            for message in &value.messages {
                let is_text = message.kind.as_deref().is_none_or(|k| k == "text");
                let Some(text) = message.text.as_ref().map(|t| t.body.trim()) else {
                    continue;
                };
                if !is_text || text.is_empty() {
                    continue;
                }
                let profile_name = value
                    .contacts
                    .iter()
                    .find(|c| c.wa_id == message.from)
                    .or_else(|| value.contacts.first())
                    .and_then(|c| c.profile.as_ref())
                    .and_then(|p| p.name.as_deref())
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(str::to_string);
                out.push(InboundText {
                    wa_id: message.from.clone(),
                    profile_name,
                    message_id: message.id.clone(),
                    text: text.to_string(),
                    timestamp: message.timestamp.clone(),
                });
            }
        }
        out
    }
}
