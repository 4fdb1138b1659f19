// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage traits for the contact / conversation / message store.

use async_trait::async_trait;

use crate::error::KedaiError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Contact, ContactSummary, Conversation, IncomingOutcome, Message, NewIncoming};

/// Lifecycle of a persistence backend.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), KedaiError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), KedaiError>;
}

/// Every read and write the ingestion controller and the dashboard need.
///
/// Implementations must keep these invariants under concurrent callers:
/// one contact per wa id, at most one OPEN conversation per contact, and at
/// most one message per channel message id.
#[async_trait]
pub trait ConversationStore: StorageAdapter {
    /// Inserts the contact or refreshes its display name.
    async fn upsert_contact(&self, wa_id: &str, name: Option<&str>) -> Result<Contact, KedaiError>;

    /// Returns the contact's OPEN conversation, creating one if none exists.
    async fn open_conversation(&self, contact_id: i64) -> Result<Conversation, KedaiError>;

    /// Returns the contact's OPEN conversation without creating one.
    async fn find_open_conversation(
        &self,
        contact_id: i64,
    ) -> Result<Option<Conversation>, KedaiError>;

    /// Whether an inbound message with this channel id is already stored.
    async fn has_incoming(&self, wa_message_id: &str) -> Result<bool, KedaiError>;

    /// Persists an inbound text message unless its channel id is already stored.
    async fn record_incoming(&self, message: NewIncoming) -> Result<IncomingOutcome, KedaiError>;

    /// Persists an outbound text message (created already read).
    async fn record_outgoing(
        &self,
        conversation_id: i64,
        contact_id: i64,
        text: &str,
    ) -> Result<Message, KedaiError>;

    /// Up to `limit` most recent messages of a conversation, oldest first,
    /// excluding `exclude_id`.
    async fn recent_messages(
        &self,
        conversation_id: i64,
        exclude_id: Option<i64>,
        limit: usize,
    ) -> Result<Vec<Message>, KedaiError>;

    /// Contacts ordered by last interaction, newest first.
    async fn list_contacts(&self) -> Result<Vec<ContactSummary>, KedaiError>;

    /// All messages of a contact in chronological order.
    async fn list_messages(&self, wa_id: &str) -> Result<Vec<Message>, KedaiError>;

    /// Marks every unread INCOMING message of the contact read. Returns the
    /// number of rows flipped.
    async fn mark_read(&self, wa_id: &str) -> Result<usize, KedaiError>;
}
