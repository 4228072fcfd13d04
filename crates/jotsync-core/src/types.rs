// SPDX-FileCopyrightText: 2026 Jotsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the store traits, the journal service, and the gateway.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::Display;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// A persisted journal entry as returned to callers.
///
/// `surrogate_id`, `created_at`, and `updated_at` are assigned by the store and
/// are never accepted as input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Server-assigned integer key. Never reused.
    pub surrogate_id: i64,
    /// Client-assigned unique identifier, the external handle for the entry.
    pub client_id: String,
    /// The prompt the entry was written against.
    pub prompt: String,
    /// Entry body.
    pub text: String,
    /// Client-side milliseconds since epoch. Sort and filter key only.
    pub timestamp: i64,
    /// ISO 8601 timestamp of first persistence.
    pub created_at: String,
    /// ISO 8601 timestamp of the last successful mutation.
    pub updated_at: String,
}

/// A client-generated entry, as submitted to the upsert operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJournalEntry {
    pub client_id: String,
    pub prompt: String,
    pub text: String,
    pub timestamp: i64,
}

/// A presence-aware field for partial updates.
///
/// A field missing from the request body deserializes to [`Patch::Unchanged`]
/// (with `#[serde(default)]` on the containing struct); a present value becomes
/// [`Patch::Set`]. An explicit JSON `null` is rejected by `T`'s own
/// deserializer, so omission and an explicit empty value never collapse into
/// one another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// The caller did not supply this field.
    #[default]
    Unchanged,
    /// The caller supplied this value.
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Patch::Unchanged)
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            Patch::Set(value) => Some(value),
            Patch::Unchanged => None,
        }
    }

    /// Overwrite `target` if this patch carries a value.
    pub fn apply(self, target: &mut T) {
        if let Patch::Set(value) = self {
            *target = value;
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Patch::Set)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Patch::Set(value) => value.serialize(serializer),
            Patch::Unchanged => serializer.serialize_none(),
        }
    }
}

/// Partial update of a journal entry. Only fields that are [`Patch::Set`] are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalEntryPatch {
    #[serde(skip_serializing_if = "Patch::is_unchanged")]
    pub prompt: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unchanged")]
    pub text: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unchanged")]
    pub timestamp: Patch<i64>,
}

impl JournalEntryPatch {
    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.prompt.is_unchanged() && self.text.is_unchanged() && self.timestamp.is_unchanged()
    }

    /// Names of the supplied fields, in declaration order. Used for logging.
    pub fn supplied_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::with_capacity(3);
        if !self.prompt.is_unchanged() {
            fields.push("prompt");
        }
        if !self.text.is_unchanged() {
            fields.push("text");
        }
        if !self.timestamp.is_unchanged() {
            fields.push("timestamp");
        }
        fields
    }

    /// Merge the supplied fields into `entry`. Server-assigned fields are untouched.
    pub fn apply_to(self, entry: &mut JournalEntry) {
        self.prompt.apply(&mut entry.prompt);
        self.text.apply(&mut entry.text);
        self.timestamp.apply(&mut entry.timestamp);
    }
}

/// Filter applied by the store's list operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JournalFilter {
    /// Only entries with `timestamp > since` (strict).
    pub since: Option<i64>,
}

impl JournalFilter {
    pub fn matches(&self, entry: &JournalEntry) -> bool {
        self.since.is_none_or(|since| entry.timestamp > since)
    }
}

/// Raw list parameters as received from the caller (`?since=&skip=&limit=`).
///
/// Values are signed so that negative input reaches validation instead of
/// failing opaquely at deserialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub since: Option<i64>,
    #[serde(default)]
    pub skip: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// One page of entries plus the total number of entries in the store.
///
/// `count` is the unfiltered total, independent of `since`,
/// `skip`, and `limit`, so it can differ from `journals.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalPage {
    pub journals: Vec<JournalEntry>,
    pub count: u64,
}

/// Whether an upsert created a new entry or overwrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum UpsertOutcome {
    Created,
    Updated,
}
