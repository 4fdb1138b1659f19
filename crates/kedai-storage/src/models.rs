// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row-to-domain mapping shared by the query modules.

use std::str::FromStr;

use kedai_core::{Contact, Conversation, Message};
use rusqlite::Row;
use rusqlite::types::Type;

/// Column list matching [`contact_from_row`].
pub(crate) const CONTACT_COLUMNS: &str =
    "id, wa_id, name, phone, last_interaction, last_message_id, created_at";

/// Column list matching [`conversation_from_row`].
pub(crate) const CONVERSATION_COLUMNS: &str = "id, contact_id, status, started_at";

/// Column list matching [`message_from_row`].
pub(crate) const MESSAGE_COLUMNS: &str =
    "id, conversation_id, contact_id, direction, kind, text, wa_message_id, timestamp, is_read";

pub(crate) fn contact_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get(offset)?,
        wa_id: row.get(offset + 1)?,
        name: row.get(offset + 2)?,
        phone: row.get(offset + 3)?,
        last_interaction: row.get(offset + 4)?,
        last_message_id: row.get(offset + 5)?,
        created_at: row.get(offset + 6)?,
    })
}

pub(crate) fn conversation_from_row(row: &Row<'_>) -> rusqlite::Result<Conversation> {
    Ok(Conversation {
        id: row.get(0)?,
        contact_id: row.get(1)?,
        status: parse_enum(row, 2)?,
        started_at: row.get(3)?,
    })
}

pub(crate) fn message_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Message> {
    Ok(Message {
        id: row.get(offset)?,
        conversation_id: row.get(offset + 1)?,
        contact_id: row.get(offset + 2)?,
        direction: parse_enum(row, offset + 3)?,
        kind: parse_enum(row, offset + 4)?,
        text: row.get(offset + 5)?,
        wa_message_id: row.get(offset + 6)?,
        timestamp: row.get(offset + 7)?,
        is_read: row.get(offset + 8)?,
    })
}

/// Parse a TEXT column holding a strum-encoded enum.
fn parse_enum<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    T::from_str(&raw).map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
