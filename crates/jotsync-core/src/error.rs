// SPDX-FileCopyrightText: 2026 Jotsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for jotsync.

use thiserror::Error;

/// The primary error type used across the store traits, the journal service,
/// and the HTTP boundary.
#[derive(Debug, Error)]
pub enum JotsyncError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// The persistence layer could not be reached or could not commit.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No journal entry exists for the addressed client identifier.
    #[error("journal not found: {client_id}")]
    NotFound { client_id: String },

    /// A raw insert collided with an existing client identifier.
    #[error("journal already exists: {client_id}")]
    Conflict { client_id: String },

    /// Malformed or missing input, rejected before the store is touched.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl JotsyncError {
    /// Shorthand for a [`JotsyncError::NotFound`] on the given client identifier.
    pub fn not_found(client_id: impl Into<String>) -> Self {
        Self::NotFound {
            client_id: client_id.into(),
        }
    }

    /// Returns true when the error is a [`JotsyncError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
