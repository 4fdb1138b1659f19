// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;

use kedai_bus::EventBus;
use kedai_core::KedaiError;
use tracing::debug;

use crate::migrations;

/// Handle to the single writer connection, plus the bus that committed
/// writes are announced on.
pub struct Database {
    conn: tokio_rusqlite::Connection,
    events: Option<EventBus>,
}

impl Database {
    /// Open (creating if needed) a WAL-mode database and run pending migrations.
    pub async fn open(path: &str) -> Result<Self, KedaiError> {
        Self::open_with(path, true, None).await
    }

    /// Open with explicit journal mode and an optional event bus.
    pub async fn open_with(
        path: &str,
        wal_mode: bool,
        events: Option<EventBus>,
    ) -> Result<Self, KedaiError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(KedaiError::storage)?;
        }

        // Migrations run on a short-lived blocking connection so that
        // refinery's errors stay out of the async call path.
        let migrate_path = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), KedaiError> {
            let mut conn = rusqlite::Connection::open(&migrate_path).map_err(KedaiError::storage)?;
            let journal = if wal_mode { "WAL" } else { "DELETE" };
            conn.pragma_update_and_check(None, "journal_mode", journal, |row| {
                row.get::<_, String>(0)
            })
            .map_err(KedaiError::storage)?;
            migrations::run_migrations(&mut conn)
        })
        .await
        .map_err(|e| KedaiError::Internal(format!("migration task failed: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(KedaiError::storage)?;
        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(
                "PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;
                 PRAGMA synchronous = NORMAL;",
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn, events })
    }

    /// The single writer connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// A clone of the event bus, for moving into a `call` closure.
    pub fn events(&self) -> Option<EventBus> {
        self.events.clone()
    }

    /// Checkpoint the WAL so the main database file is self-contained.
    pub async fn close(&self) -> Result<(), KedaiError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Convert a tokio-rusqlite error into `KedaiError::Storage`.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> KedaiError {
    KedaiError::Storage {
        source: Box::new(e),
    }
}

/// Current UTC time in the millisecond ISO 8601 format used by every table.
pub(crate) fn now_iso() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("kedai.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();

        let tables: Vec<String> = db
            .connection()
            .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type = 'table'
                     AND name IN ('contacts', 'conversations', 'messages') ORDER BY name",
                )?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                rows.collect()
            })
            .await
            .unwrap();

        assert_eq!(tables, vec!["contacts", "conversations", "messages"]);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reopening_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kedai.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        db.close().await.unwrap();
        drop(db);

        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        db.close().await.unwrap();
    }

    #[test]
    fn now_iso_has_millisecond_utc_format() {
        let now = now_iso();
        assert_eq!(now.len(), 24);
        assert!(now.ends_with('Z'));
    }
}
