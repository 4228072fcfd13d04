// SPDX-FileCopyrightText: 2026 Jotsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness wiring a [`JournalService`] to a real store.
//!
//! `TestHarness` owns a temp directory holding a fresh SQLite database, or an
//! in-memory store when built with [`TestHarnessBuilder::in_memory`].

use std::sync::Arc;

use jotsync_config::model::StorageConfig;
use jotsync_core::types::NewJournalEntry;
use jotsync_core::{JotsyncError, JournalService, JournalStore, PageLimits, StorageAdapter};
use jotsync_storage::SqliteStorage;

use crate::memory_store::MemoryJournalStore;

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    in_memory: bool,
    limits: PageLimits,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            in_memory: false,
            limits: PageLimits::default(),
        }
    }

    /// Back the service with [`MemoryJournalStore`] instead of SQLite.
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    pub fn with_page_limits(mut self, limits: PageLimits) -> Self {
        self.limits = limits;
        self
    }

    pub async fn build(self) -> Result<TestHarness, JotsyncError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| JotsyncError::Storage { source: e.into() })?;

        let (store, memory) = if self.in_memory {
            let memory = Arc::new(MemoryJournalStore::new());
            (memory.clone() as Arc<dyn JournalStore>, Some(memory))
        } else {
            let db_path = temp_dir.path().join("journals.db");
            let storage = SqliteStorage::new(StorageConfig {
                database_path: db_path.to_string_lossy().to_string(),
                ..StorageConfig::default()
            });
            storage.initialize().await?;
            (Arc::new(storage) as Arc<dyn JournalStore>, None)
        };
        let service = JournalService::new(store).with_page_limits(self.limits);

        Ok(TestHarness {
            service,
            memory,
            _temp_dir: temp_dir,
        })
    }
}

/// A journal service over a throwaway store.
pub struct TestHarness {
    pub service: JournalService,
    memory: Option<Arc<MemoryJournalStore>>,
    // Dropped last so the database file outlives the connection.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness over a fresh SQLite database with default page limits.
    pub async fn sqlite() -> Result<Self, JotsyncError> {
        Self::builder().build().await
    }

    /// Harness over an empty [`MemoryJournalStore`].
    pub async fn memory() -> Result<Self, JotsyncError> {
        Self::builder().in_memory().build().await
    }

    /// The in-memory store, when the harness is memory-backed.
    pub fn memory_store(&self) -> Option<&Arc<MemoryJournalStore>> {
        self.memory.as_ref()
    }

    /// Upsert a canned entry whose prompt and text are derived from `client_id`.
    pub async fn seed(&self, client_id: &str, timestamp: i64) -> Result<(), JotsyncError> {
        self.service.upsert(new_entry(client_id, timestamp)).await?;
        Ok(())
    }
}

/// A candidate entry with placeholder prompt and text.
pub fn new_entry(client_id: &str, timestamp: i64) -> NewJournalEntry {
    NewJournalEntry {
        client_id: client_id.to_string(),
        prompt: format!("prompt {client_id}"),
        text: format!("text {client_id}"),
        timestamp,
    }
}
