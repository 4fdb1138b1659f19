// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message persistence, history and read tracking.
//!
//! Every insert also moves the contact's `last_message_id` and
//! `last_interaction` in the same transaction. Events are published after
//! commit from inside the writer closure, so subscribers observe them in
//! commit order.

use kedai_bus::{EventBus, KedaiEvent};
use kedai_core::{Contact, Direction, IncomingOutcome, KedaiError, Message, NewIncoming};
use rusqlite::{Transaction, params};

use crate::database::{Database, now_iso};
use crate::models::{CONTACT_COLUMNS, MESSAGE_COLUMNS, contact_from_row, message_from_row};

/// Persist an inbound text message unless its channel id is already stored.
pub async fn record_incoming(
    db: &Database,
    incoming: NewIncoming,
) -> Result<IncomingOutcome, KedaiError> {
    let events = db.events();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let timestamp = incoming.timestamp.clone().unwrap_or_else(now_iso);
            let inserted = tx.execute(
                "INSERT INTO messages
                     (conversation_id, contact_id, direction, kind, text, wa_message_id, timestamp, is_read)
                 VALUES (?1, ?2, 'INCOMING', 'TEXT', ?3, ?4, ?5, 0)
                 ON CONFLICT (wa_message_id) DO NOTHING",
                params![
                    incoming.conversation_id,
                    incoming.contact_id,
                    incoming.text,
                    incoming.wa_message_id,
                    timestamp,
                ],
            )?;
            if inserted == 0 {
                tx.commit()?;
                return Ok(IncomingOutcome::Duplicate);
            }

            let id = tx.last_insert_rowid();
            let (message, contact) = touch_contact(&tx, id, incoming.contact_id)?;
            tx.commit()?;
            announce(events.as_ref(), message.clone(), contact);
            Ok(IncomingOutcome::Created(message))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Whether an inbound message with this channel id is already stored.
pub async fn has_incoming(db: &Database, wa_message_id: &str) -> Result<bool, KedaiError> {
    let wa_message_id = wa_message_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT EXISTS (SELECT 1 FROM messages WHERE wa_message_id = ?1)",
                params![wa_message_id],
                |row| row.get::<_, bool>(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Persist an outbound text message. Outbound rows are created read.
pub async fn record_outgoing(
    db: &Database,
    conversation_id: i64,
    contact_id: i64,
    text: &str,
) -> Result<Message, KedaiError> {
    let text = text.to_string();
    let events = db.events();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO messages
                     (conversation_id, contact_id, direction, kind, text, wa_message_id, timestamp, is_read)
                 VALUES (?1, ?2, 'OUTGOING', 'TEXT', ?3, NULL, ?4, 1)",
                params![conversation_id, contact_id, text, now_iso()],
            )?;
            let id = tx.last_insert_rowid();
            let (message, contact) = touch_contact(&tx, id, contact_id)?;
            tx.commit()?;
            announce(events.as_ref(), message.clone(), contact);
            Ok(message)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Point the contact at its newest message and read both rows back.
fn touch_contact(
    tx: &Transaction<'_>,
    message_id: i64,
    contact_id: i64,
) -> rusqlite::Result<(Message, Contact)> {
    let message = tx.query_row(
        &format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?1"),
        params![message_id],
        |row| message_from_row(row, 0),
    )?;
    let contact = tx.query_row(
        &format!(
            "UPDATE contacts SET last_message_id = ?1, last_interaction = ?2
             WHERE id = ?3
             RETURNING {CONTACT_COLUMNS}"
        ),
        params![message_id, now_iso(), contact_id],
        |row| contact_from_row(row, 0),
    )?;
    Ok((message, contact))
}

fn announce(events: Option<&EventBus>, message: Message, contact: Contact) {
    if let Some(bus) = events {
        bus.publish(KedaiEvent::NewMessage {
            wa_id: contact.wa_id.clone(),
            message,
        });
        bus.publish(KedaiEvent::ContactUpdated { contact });
    }
}

/// Up to `limit` most recent messages of a conversation in chronological
/// order, skipping `exclude_id`.
pub async fn recent_messages(
    db: &Database,
    conversation_id: i64,
    exclude_id: Option<i64>,
    limit: usize,
) -> Result<Vec<Message>, KedaiError> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages
                 WHERE conversation_id = ?1 AND (?2 IS NULL OR id <> ?2)
                 ORDER BY id DESC
                 LIMIT ?3"
            ))?;
            let rows = stmt.query_map(params![conversation_id, exclude_id, limit], |row| {
                message_from_row(row, 0)
            })?;
            let mut messages = rows.collect::<rusqlite::Result<Vec<_>>>()?;
            messages.reverse();
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Every message of a contact, oldest first.
pub async fn list_messages(db: &Database, wa_id: &str) -> Result<Vec<Message>, KedaiError> {
    let wa_id = wa_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT m.id, m.conversation_id, m.contact_id, m.direction, m.kind, m.text,
                        m.wa_message_id, m.timestamp, m.is_read
                 FROM messages m
                 JOIN contacts c ON c.id = m.contact_id
                 WHERE c.wa_id = ?1
                 ORDER BY m.id ASC",
            )?;
            let rows = stmt.query_map(params![wa_id], |row| message_from_row(row, 0))?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Flip every unread INCOMING message of the contact to read.
///
/// Returns the number of rows changed. A `MessagesRead` event is published
/// only when at least one row changed, so repeated calls are silent.
pub async fn mark_read(db: &Database, wa_id: &str) -> Result<usize, KedaiError> {
    let wa_id = wa_id.to_string();
    let events = db.events();
    db.connection()
        .call(move |conn| {
            let count = conn.execute(
                "UPDATE messages SET is_read = 1
                 WHERE is_read = 0
                   AND direction = ?2
                   AND contact_id = (SELECT id FROM contacts WHERE wa_id = ?1)",
                params![wa_id, Direction::Incoming.to_string()],
            )?;
            if count > 0
                && let Some(bus) = &events
            {
                bus.publish(KedaiEvent::MessagesRead { wa_id, count });
            }
            Ok(count)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
