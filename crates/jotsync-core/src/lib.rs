// SPDX-FileCopyrightText: 2026 Jotsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for jotsync.
//!
//! Holds the journal entry types, the error taxonomy, the storage traits that
//! backends implement, and [`JournalService`], which applies the
//! upsert-by-client-id reconciliation rule and the paginated listing on top of
//! any [`JournalStore`].

pub mod error;
pub mod service;
pub mod traits;
pub mod types;

pub use error::JotsyncError;
pub use service::{JournalService, PageLimits, PageRequest};
pub use traits::{JournalStore, PluginAdapter, StorageAdapter};
pub use types::{
    HealthStatus, JournalEntry, JournalEntryPatch, JournalFilter, JournalPage, ListParams,
    NewJournalEntry, Patch, UpsertOutcome,
};
