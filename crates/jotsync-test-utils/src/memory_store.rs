// SPDX-FileCopyrightText: 2026 Jotsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory [`JournalStore`] for fast, deterministic tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use jotsync_core::types::{
    JournalEntry, JournalEntryPatch, JournalFilter, NewJournalEntry, UpsertOutcome,
};
use jotsync_core::{JotsyncError, JournalStore};
use tokio::sync::Mutex;

#[derive(Default)]
struct Inner {
    next_id: i64,
    // Kept in insertion order so a stable sort yields the tie-break.
    entries: Vec<JournalEntry>,
}

impl Inner {
    fn position(&self, client_id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.client_id == client_id)
    }

    fn push(&mut self, entry: &NewJournalEntry) -> JournalEntry {
        self.next_id += 1;
        let now = now_iso();
        let created = JournalEntry {
            surrogate_id: self.next_id,
            client_id: entry.client_id.clone(),
            prompt: entry.prompt.clone(),
            text: entry.text.clone(),
            timestamp: entry.timestamp,
            created_at: now.clone(),
            updated_at: now,
        };
        self.entries.push(created.clone());
        created
    }
}

fn now_iso() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// A [`JournalStore`] held entirely in process memory.
///
/// One mutex guards every operation, so each call is atomic. Call
/// [`MemoryJournalStore::set_unavailable`] to make every operation fail with
/// [`JotsyncError::Storage`].
#[derive(Default)]
pub struct MemoryJournalStore {
    inner: Mutex<Inner>,
    unavailable: AtomicBool,
}

impl MemoryJournalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a lost backend.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of every stored entry in insertion order.
    pub async fn entries(&self) -> Vec<JournalEntry> {
        self.inner.lock().await.entries.clone()
    }

    fn check_available(&self) -> Result<(), JotsyncError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(JotsyncError::Storage {
                source: "memory store marked unavailable".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl JournalStore for MemoryJournalStore {
    async fn find_by_client_id(
        &self,
        client_id: &str,
    ) -> Result<Option<JournalEntry>, JotsyncError> {
        self.check_available()?;
        let inner = self.inner.lock().await;
        Ok(inner.position(client_id).map(|i| inner.entries[i].clone()))
    }

    async fn list(
        &self,
        filter: &JournalFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<JournalEntry>, JotsyncError> {
        self.check_available()?;
        let inner = self.inner.lock().await;
        let mut matching: Vec<&JournalEntry> =
            inner.entries.iter().filter(|e| filter.matches(e)).collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(matching
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<u64, JotsyncError> {
        self.check_available()?;
        Ok(self.inner.lock().await.entries.len() as u64)
    }

    async fn insert(&self, entry: &NewJournalEntry) -> Result<JournalEntry, JotsyncError> {
        self.check_available()?;
        let mut inner = self.inner.lock().await;
        if inner.position(&entry.client_id).is_some() {
            return Err(JotsyncError::Conflict {
                client_id: entry.client_id.clone(),
            });
        }
        Ok(inner.push(entry))
    }

    async fn replace_fields(
        &self,
        client_id: &str,
        patch: &JournalEntryPatch,
    ) -> Result<Option<JournalEntry>, JotsyncError> {
        self.check_available()?;
        let mut inner = self.inner.lock().await;
        let Some(i) = inner.position(client_id) else {
            return Ok(None);
        };
        let entry = &mut inner.entries[i];
        patch.clone().apply_to(entry);
        entry.updated_at = now_iso();
        Ok(Some(entry.clone()))
    }

    async fn delete(&self, client_id: &str) -> Result<bool, JotsyncError> {
        self.check_available()?;
        let mut inner = self.inner.lock().await;
        match inner.position(client_id) {
            Some(i) => {
                inner.entries.remove(i);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn upsert(
        &self,
        candidate: &NewJournalEntry,
    ) -> Result<(JournalEntry, UpsertOutcome), JotsyncError> {
        self.check_available()?;
        let mut inner = self.inner.lock().await;
        match inner.position(&candidate.client_id) {
            Some(i) => {
                let entry = &mut inner.entries[i];
                entry.prompt = candidate.prompt.clone();
                entry.text = candidate.text.clone();
                entry.timestamp = candidate.timestamp;
                entry.updated_at = now_iso();
                Ok((entry.clone(), UpsertOutcome::Updated))
            }
            None => Ok((inner.push(candidate), UpsertOutcome::Created)),
        }
    }
}
