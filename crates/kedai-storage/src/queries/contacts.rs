// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact upsert and dashboard listing.

use kedai_bus::KedaiEvent;
use kedai_core::{Contact, ContactSummary, KedaiError};
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, now_iso};
use crate::models::{CONTACT_COLUMNS, contact_from_row, message_from_row};

/// Insert the contact, or refresh its name and last interaction.
///
/// A missing profile name keeps the stored one; a brand-new contact without
/// a profile name is named after its wa id.
pub async fn upsert_contact(
    db: &Database,
    wa_id: &str,
    name: Option<&str>,
) -> Result<Contact, KedaiError> {
    let wa_id = wa_id.to_string();
    let name = name.map(str::trim).filter(|n| !n.is_empty()).map(String::from);
    let events = db.events();
    db.connection()
        .call(move |conn| {
            let now = now_iso();
            let contact = conn.query_row(
                &format!(
                    "INSERT INTO contacts (wa_id, name, phone, last_interaction, created_at)
                     VALUES (?1, COALESCE(?2, ?1), ?1, ?3, ?3)
                     ON CONFLICT (wa_id) DO UPDATE SET
                         name = COALESCE(?2, contacts.name),
                         last_interaction = ?3
                     RETURNING {CONTACT_COLUMNS}"
                ),
                params![wa_id, name, now],
                |row| contact_from_row(row, 0),
            )?;
            if let Some(bus) = &events {
                bus.publish(KedaiEvent::ContactUpdated {
                    contact: contact.clone(),
                });
            }
            Ok(contact)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Look up a contact by wa id.
pub async fn get_contact(db: &Database, wa_id: &str) -> Result<Option<Contact>, KedaiError> {
    let wa_id = wa_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE wa_id = ?1"),
                params![wa_id],
                |row| contact_from_row(row, 0),
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All contacts, most recent interaction first, with their last message and
/// unread INCOMING count.
pub async fn list_contacts(db: &Database) -> Result<Vec<ContactSummary>, KedaiError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.wa_id, c.name, c.phone, c.last_interaction, c.last_message_id,
                        c.created_at,
                        (SELECT COUNT(*) FROM messages u
                          WHERE u.contact_id = c.id AND u.direction = 'INCOMING' AND u.is_read = 0),
                        m.id, m.conversation_id, m.contact_id, m.direction, m.kind, m.text,
                        m.wa_message_id, m.timestamp, m.is_read
                 FROM contacts c
                 LEFT JOIN messages m ON m.id = c.last_message_id
                 ORDER BY c.last_interaction DESC, c.id DESC",
            )?;
            let rows = stmt.query_map([], |row| {
                let last_message = match row.get::<_, Option<i64>>(8)? {
                    Some(_) => Some(message_from_row(row, 8)?),
                    None => None,
                };
                Ok(ContactSummary {
                    contact: contact_from_row(row, 0)?,
                    unread_count: row.get(7)?,
                    last_message,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}
