// SPDX-FileCopyrightText: 2026 Jotsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage traits: backend lifecycle and the journal entry store.

use async_trait::async_trait;

use crate::error::JotsyncError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{JournalEntry, JournalEntryPatch, JournalFilter, NewJournalEntry, UpsertOutcome};

/// Adapter for storage and persistence backends.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (schema, connection, etc.).
    async fn initialize(&self) -> Result<(), JotsyncError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), JotsyncError>;
}

/// Durable collection of journal entries with a uniqueness constraint on
/// `client_id`.
///
/// Every method is atomic with respect to every other: an implementation must
/// never expose a partially applied write. Absence is reported as `None` or
/// `false`; errors are reserved for backend failures.
#[async_trait]
pub trait JournalStore: Send + Sync + 'static {
    /// Look up one entry by its client identifier.
    async fn find_by_client_id(&self, client_id: &str)
    -> Result<Option<JournalEntry>, JotsyncError>;

    /// Entries matching `filter`, ordered by `timestamp` descending with ties
    /// in insertion order, windowed by `offset` and `limit`.
    async fn list(
        &self,
        filter: &JournalFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<JournalEntry>, JotsyncError>;

    /// Total number of entries, regardless of any filter.
    async fn count(&self) -> Result<u64, JotsyncError>;

    /// Persist a new entry, assigning its surrogate id and timestamps.
    ///
    /// Fails with [`JotsyncError::Conflict`] if the client identifier exists.
    async fn insert(&self, entry: &NewJournalEntry) -> Result<JournalEntry, JotsyncError>;

    /// Apply the supplied fields of `patch` and refresh `updated_at`.
    ///
    /// Returns `None` if no entry has that client identifier.
    async fn replace_fields(
        &self,
        client_id: &str,
        patch: &JournalEntryPatch,
    ) -> Result<Option<JournalEntry>, JotsyncError>;

    /// Remove an entry permanently. Returns whether a row was removed.
    async fn delete(&self, client_id: &str) -> Result<bool, JotsyncError>;

    /// Create the entry if its client identifier is new, otherwise overwrite
    /// `prompt`, `text`, and `timestamp` in place, keeping `surrogate_id` and
    /// `created_at`.
    ///
    /// The lookup and the write happen as one atomic step, so concurrent
    /// upserts of one client identifier leave exactly one entry.
    async fn upsert(
        &self,
        candidate: &NewJournalEntry,
    ) -> Result<(JournalEntry, UpsertOutcome), JotsyncError>;
}
