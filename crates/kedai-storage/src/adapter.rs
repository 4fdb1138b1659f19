// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the storage traits.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use kedai_bus::EventBus;
use kedai_config::model::StorageConfig;
use kedai_core::{
    AdapterType, Contact, ContactSummary, Conversation, ConversationStore, HealthStatus,
    IncomingOutcome, KedaiError, Message, NewIncoming, PluginAdapter, StorageAdapter,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed conversation store.
///
/// The database is opened on the first call to [`StorageAdapter::initialize`].
pub struct SqliteStore {
    config: StorageConfig,
    events: Option<EventBus>,
    db: OnceCell<Database>,
}

impl SqliteStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            events: None,
            db: OnceCell::new(),
        }
    }

    /// Publish live-update events for every committed write.
    pub fn with_events(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    fn db(&self) -> Result<&Database, KedaiError> {
        self.db.get().ok_or_else(|| KedaiError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, KedaiError> {
        self.db()?
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), KedaiError> {
        if let Some(db) = self.db.get() {
            db.close().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStore {
    async fn initialize(&self) -> Result<(), KedaiError> {
        let db = Database::open_with(
            &self.config.database_path,
            self.config.wal_mode,
            self.events.clone(),
        )
        .await?;
        self.db
            .set(db)
            .map_err(|_| KedaiError::Internal("storage already initialized".into()))?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), KedaiError> {
        self.db()?.close().await
    }
}

#[async_trait]
impl ConversationStore for SqliteStore {
    async fn upsert_contact(&self, wa_id: &str, name: Option<&str>) -> Result<Contact, KedaiError> {
        queries::contacts::upsert_contact(self.db()?, wa_id, name).await
    }

    async fn open_conversation(&self, contact_id: i64) -> Result<Conversation, KedaiError> {
        queries::conversations::open_conversation(self.db()?, contact_id).await
    }

    async fn find_open_conversation(
        &self,
        contact_id: i64,
    ) -> Result<Option<Conversation>, KedaiError> {
        queries::conversations::find_open_conversation(self.db()?, contact_id).await
    }

    async fn has_incoming(&self, wa_message_id: &str) -> Result<bool, KedaiError> {
        queries::messages::has_incoming(self.db()?, wa_message_id).await
    }

    async fn record_incoming(&self, message: NewIncoming) -> Result<IncomingOutcome, KedaiError> {
        queries::messages::record_incoming(self.db()?, message).await
    }

    async fn record_outgoing(
        &self,
        conversation_id: i64,
        contact_id: i64,
        text: &str,
    ) -> Result<Message, KedaiError> {
        queries::messages::record_outgoing(self.db()?, conversation_id, contact_id, text).await
    }

    async fn recent_messages(
        &self,
        conversation_id: i64,
        exclude_id: Option<i64>,
        limit: usize,
    ) -> Result<Vec<Message>, KedaiError> {
        queries::messages::recent_messages(self.db()?, conversation_id, exclude_id, limit).await
    }

    async fn list_contacts(&self) -> Result<Vec<ContactSummary>, KedaiError> {
        queries::contacts::list_contacts(self.db()?).await
    }

    async fn list_messages(&self, wa_id: &str) -> Result<Vec<Message>, KedaiError> {
        queries::messages::list_messages(self.db()?, wa_id).await
    }

    async fn mark_read(&self, wa_id: &str) -> Result<usize, KedaiError> {
        queries::messages::mark_read(self.db()?, wa_id).await
    }
}
