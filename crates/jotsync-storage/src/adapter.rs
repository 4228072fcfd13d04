// SPDX-FileCopyrightText: 2026 Jotsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the storage traits.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use jotsync_config::model::StorageConfig;
use jotsync_core::types::{
    JournalEntry, JournalEntryPatch, JournalFilter, NewJournalEntry, UpsertOutcome,
};
use jotsync_core::{HealthStatus, JotsyncError, JournalStore, PluginAdapter, StorageAdapter};

use crate::database::Database;
use crate::queries;

/// SQLite-backed journal store.
///
/// Wraps a [`Database`] handle and delegates every query to
/// [`queries::journals`]. The database is opened on the first call to
/// [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// The connection is not opened until [`StorageAdapter::initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Construct and initialize in one step.
    pub async fn open(config: StorageConfig) -> Result<Self, JotsyncError> {
        let storage = Self::new(config);
        storage.initialize().await?;
        Ok(storage)
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn db(&self) -> Result<&Database, JotsyncError> {
        self.db.get().ok_or_else(|| JotsyncError::Storage {
            source: "storage not initialized, call initialize() first".into(),
        })
    }

    /// Run `PRAGMA integrity_check` and return the reported lines.
    ///
    /// A healthy database reports exactly `["ok"]`.
    pub async fn integrity_check(&self) -> Result<Vec<String>, JotsyncError> {
        self.db()?
            .connection()
            .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
                let mut stmt = conn.prepare("PRAGMA integrity_check")?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                rows.collect()
            })
            .await
            .map_err(crate::database::map_tr_err)
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, JotsyncError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row("SELECT 1", [], |row| row.get(0))
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), JotsyncError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), JotsyncError> {
        let db = Database::open_with_config(&self.config).await?;
        self.db.set(db).map_err(|_| JotsyncError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), JotsyncError> {
        self.db()?.checkpoint().await
    }
}

#[async_trait]
impl JournalStore for SqliteStorage {
    async fn find_by_client_id(
        &self,
        client_id: &str,
    ) -> Result<Option<JournalEntry>, JotsyncError> {
        queries::journals::find_by_client_id(self.db()?, client_id).await
    }

    async fn list(
        &self,
        filter: &JournalFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<JournalEntry>, JotsyncError> {
        queries::journals::list(self.db()?, filter, offset, limit).await
    }

    async fn count(&self) -> Result<u64, JotsyncError> {
        queries::journals::count(self.db()?).await
    }

    async fn insert(&self, entry: &NewJournalEntry) -> Result<JournalEntry, JotsyncError> {
        queries::journals::insert(self.db()?, entry).await
    }

    async fn replace_fields(
        &self,
        client_id: &str,
        patch: &JournalEntryPatch,
    ) -> Result<Option<JournalEntry>, JotsyncError> {
        queries::journals::replace_fields(self.db()?, client_id, patch).await
    }

    async fn delete(&self, client_id: &str) -> Result<bool, JotsyncError> {
        queries::journals::delete(self.db()?, client_id).await
    }

    async fn upsert(
        &self,
        candidate: &NewJournalEntry,
    ) -> Result<(JournalEntry, UpsertOutcome), JotsyncError> {
        queries::journals::upsert(self.db()?, candidate).await
    }
}
