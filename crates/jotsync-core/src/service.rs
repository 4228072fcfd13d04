// SPDX-FileCopyrightText: 2026 Jotsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Journal sync service: upsert-by-client-id reconciliation and the paginated
//! retrieval query, layered over any [`JournalStore`].
//!
//! The service owns no state of its own. It validates input before touching
//! the store, turns store-level absence into [`JotsyncError::NotFound`], and
//! never retries a failed store call.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::JotsyncError;
use crate::traits::JournalStore;
use crate::types::{
    JournalEntry, JournalEntryPatch, JournalFilter, JournalPage, ListParams, NewJournalEntry,
};

/// Page size used when the caller passes no `limit`.
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// Pagination bounds applied by [`JournalService::list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    /// Page size used when the caller passes no `limit`.
    pub default_page_size: u64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// A validated list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub filter: JournalFilter,
    pub offset: u64,
    pub limit: u64,
}

impl PageLimits {
    /// Validate raw list parameters and resolve defaults.
    ///
    /// `skip` must be non-negative and `limit` strictly positive. An explicit
    /// `limit` is used as given, however large.
    pub fn resolve(&self, params: &ListParams) -> Result<PageRequest, JotsyncError> {
        let offset = match params.skip {
            None => 0,
            Some(skip) if skip >= 0 => skip as u64,
            Some(skip) => {
                return Err(JotsyncError::Validation(format!(
                    "skip must be non-negative, got {skip}"
                )));
            }
        };

        let limit = match params.limit {
            None => self.default_page_size,
            Some(limit) if limit > 0 => limit as u64,
            Some(limit) => {
                return Err(JotsyncError::Validation(format!(
                    "limit must be greater than zero, got {limit}"
                )));
            }
        };

        Ok(PageRequest {
            filter: JournalFilter {
                since: params.since,
            },
            offset,
            limit,
        })
    }
}

/// Reconciliation and retrieval over a shared [`JournalStore`].
#[derive(Clone)]
pub struct JournalService {
    store: Arc<dyn JournalStore>,
    limits: PageLimits,
}

impl std::fmt::Debug for JournalService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JournalService")
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl JournalService {
    /// Create a service with default page limits.
    pub fn new(store: Arc<dyn JournalStore>) -> Self {
        Self {
            store,
            limits: PageLimits::default(),
        }
    }

    /// Replace the pagination bounds.
    pub fn with_page_limits(mut self, limits: PageLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Create the entry if `candidate.client_id` is new, otherwise overwrite
    /// its `prompt`, `text`, and `timestamp` (last write wins).
    pub async fn upsert(&self, candidate: NewJournalEntry) -> Result<JournalEntry, JotsyncError> {
        if candidate.client_id.trim().is_empty() {
            return Err(JotsyncError::Validation(
                "client_id must not be empty".to_string(),
            ));
        }

        let (entry, outcome) = self.store.upsert(&candidate).await?;
        info!(
            client_id = %entry.client_id,
            surrogate_id = entry.surrogate_id,
            %outcome,
            "journal entry upserted"
        );
        Ok(entry)
    }

    /// Point lookup by client identifier.
    pub async fn get(&self, client_id: &str) -> Result<JournalEntry, JotsyncError> {
        self.store
            .find_by_client_id(client_id)
            .await?
            .ok_or_else(|| JotsyncError::not_found(client_id))
    }

    /// Merge the supplied fields of `patch` into an existing entry.
    ///
    /// Omitted fields are left untouched. `updated_at` is refreshed even when
    /// the patch supplies nothing.
    pub async fn partial_update(
        &self,
        client_id: &str,
        patch: JournalEntryPatch,
    ) -> Result<JournalEntry, JotsyncError> {
        let fields = patch.supplied_fields();
        let entry = self
            .store
            .replace_fields(client_id, &patch)
            .await?
            .ok_or_else(|| JotsyncError::not_found(client_id))?;
        debug!(client_id, ?fields, "journal entry updated");
        Ok(entry)
    }

    /// Remove an entry permanently.
    pub async fn delete(&self, client_id: &str) -> Result<(), JotsyncError> {
        if !self.store.delete(client_id).await? {
            return Err(JotsyncError::not_found(client_id));
        }
        info!(client_id, "journal entry deleted");
        Ok(())
    }

    /// One page of entries (newest client timestamp first) plus the total
    /// number of entries in the store.
    pub async fn list(&self, params: &ListParams) -> Result<JournalPage, JotsyncError> {
        let request = self.limits.resolve(params)?;
        let journals = self
            .store
            .list(&request.filter, request.offset, request.limit)
            .await?;
        let count = self.store.count().await?;
        debug!(
            since = ?request.filter.since,
            offset = request.offset,
            limit = request.limit,
            returned = journals.len(),
            count,
            "journal page listed"
        );
        Ok(JournalPage { journals, count })
    }
}
