// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation lookup and find-or-create.

use kedai_core::{Conversation, KedaiError};
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, now_iso};
use crate::models::{CONVERSATION_COLUMNS, conversation_from_row};

/// Return the contact's OPEN conversation, creating it if none exists.
///
/// The partial unique index on OPEN conversations turns a concurrent second
/// insert into a no-op, so both callers read back the same row.
pub async fn open_conversation(db: &Database, contact_id: i64) -> Result<Conversation, KedaiError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO conversations (contact_id, status, started_at)
                 VALUES (?1, 'OPEN', ?2)
                 ON CONFLICT DO NOTHING",
                params![contact_id, now_iso()],
            )?;
            let conversation = tx.query_row(
                &format!(
                    "SELECT {CONVERSATION_COLUMNS} FROM conversations
                     WHERE contact_id = ?1 AND status = 'OPEN'"
                ),
                params![contact_id],
                conversation_from_row,
            )?;
            tx.commit()?;
            Ok(conversation)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Return the contact's OPEN conversation without creating one.
pub async fn find_open_conversation(
    db: &Database,
    contact_id: i64,
) -> Result<Option<Conversation>, KedaiError> {
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!(
                    "SELECT {CONVERSATION_COLUMNS} FROM conversations
                     WHERE contact_id = ?1 AND status = 'OPEN'"
                ),
                params![contact_id],
                conversation_from_row,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}
