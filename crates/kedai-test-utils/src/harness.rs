// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temp-directory SQLite store wired to an event bus.

use std::sync::Arc;

use kedai_bus::EventBus;
use kedai_config::model::StorageConfig;
use kedai_core::{KedaiError, StorageAdapter};
use kedai_storage::SqliteStore;

/// An initialized [`SqliteStore`] in a temp directory that is removed on drop.
pub struct TestHarness {
    /// The store, publishing to [`TestHarness::bus`].
    pub store: Arc<SqliteStore>,
    /// Live-update bus the store publishes to.
    pub bus: EventBus,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub async fn new() -> Result<Self, KedaiError> {
        let temp_dir = tempfile::TempDir::new().map_err(KedaiError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let bus = EventBus::default();
        let store = SqliteStore::new(StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        })
        .with_events(bus.clone());
        store.initialize().await?;

        Ok(Self {
            store: Arc::new(store),
            bus,
            _temp_dir: temp_dir,
        })
    }
}
