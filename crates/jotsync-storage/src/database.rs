// SPDX-FileCopyrightText: 2026 Jotsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All reads and writes are serialized through tokio-rusqlite's single
//! background thread. The `Database` struct IS the single writer: query
//! modules accept `&Database` and run their statements as one closure through
//! [`Database::connection`]. Do NOT open additional connections for writes.

use std::path::Path;

use jotsync_config::model::StorageConfig;
use jotsync_core::JotsyncError;
use tokio_rusqlite::Connection;
use tracing::{debug, info};

use crate::migrations;

/// Convert a tokio-rusqlite error into [`JotsyncError::Storage`].
pub fn map_tr_err<E>(e: tokio_rusqlite::Error<E>) -> JotsyncError
where
    tokio_rusqlite::Error<E>: std::error::Error + Send + Sync + 'static,
{
    JotsyncError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the journal database file.
pub struct Database {
    conn: Connection,
    path: String,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("path", &self.path).finish()
    }
}

impl Database {
    /// Open (or create) the database at `path` with default storage settings.
    pub async fn open(path: &str) -> Result<Self, JotsyncError> {
        let config = StorageConfig {
            database_path: path.to_string(),
            ..StorageConfig::default()
        };
        Self::open_with_config(&config).await
    }

    /// Open (or create) the database described by `config`.
    ///
    /// Creates missing parent directories, applies connection PRAGMAs, and runs
    /// pending migrations before returning.
    pub async fn open_with_config(config: &StorageConfig) -> Result<Self, JotsyncError> {
        let path = config.database_path.clone();
        ensure_parent_dir(&path)?;

        let conn = Connection::open(&path)
            .await
            .map_err(|e| JotsyncError::Storage {
                source: Box::new(e),
            })?;

        let wal_mode = config.wal_mode;
        let busy_timeout_ms = config.busy_timeout_ms;
        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            conn.busy_timeout(std::time::Duration::from_millis(busy_timeout_ms))?;
            if wal_mode {
                let mode: String = conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                    row.get(0)
                })?;
                debug!(mode = %mode, "journal mode set");
            }
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
        debug!(path = %path, wal_mode, busy_timeout_ms, "connection pragmas applied");

        conn.call(|conn| -> Result<(), JotsyncError> { migrations::run_migrations(conn) })
            .await
            .map_err(map_tr_err)?;

        info!(path = %path, "journal database ready");
        Ok(Self { conn, path })
    }

    /// The shared connection. Every statement goes through its `call()`.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fold the WAL back into the main database file.
    pub async fn checkpoint(&self) -> Result<(), JotsyncError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))
            })
            .await
            .map_err(map_tr_err)?;
        debug!(path = %self.path, "WAL checkpoint complete");
        Ok(())
    }

    /// Checkpoint and close the connection.
    pub async fn close(self) -> Result<(), JotsyncError> {
        self.checkpoint().await?;
        self.conn.close().await.map_err(map_tr_err)
    }
}

fn ensure_parent_dir(path: &str) -> Result<(), JotsyncError> {
    match Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| JotsyncError::Storage {
                source: Box::new(e),
            })
        }
        _ => Ok(()),
    }
}
