// SPDX-FileCopyrightText: 2026 Jotsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Journal entry CRUD operations.
//!
//! Each function runs as a single closure on the connection thread, so the
//! multi-statement operations (upsert, partial update) are never interleaved
//! with another writer.

use jotsync_core::JotsyncError;
use jotsync_core::types::{
    JournalEntry, JournalEntryPatch, JournalFilter, NewJournalEntry, UpsertOutcome,
};
use rusqlite::{OptionalExtension, TransactionBehavior, params};

use crate::database::Database;

const SELECT_COLUMNS: &str =
    "SELECT id, client_id, prompt, text, timestamp, created_at, updated_at FROM journals";

fn row_to_entry(row: &rusqlite::Row<'_>) -> Result<JournalEntry, rusqlite::Error> {
    Ok(JournalEntry {
        surrogate_id: row.get(0)?,
        client_id: row.get(1)?,
        prompt: row.get(2)?,
        text: row.get(3)?,
        timestamp: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn select_by_client_id(
    conn: &rusqlite::Connection,
    client_id: &str,
) -> Result<Option<JournalEntry>, rusqlite::Error> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE client_id = ?1"),
        params![client_id],
        row_to_entry,
    )
    .optional()
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Saturating conversion for LIMIT/OFFSET binds.
fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Get an entry by client identifier.
pub async fn find_by_client_id(
    db: &Database,
    client_id: &str,
) -> Result<Option<JournalEntry>, JotsyncError> {
    let client_id = client_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<JournalEntry>, rusqlite::Error> {
            select_by_client_id(conn, &client_id)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List entries newest client timestamp first, ties in insertion order.
pub async fn list(
    db: &Database,
    filter: &JournalFilter,
    offset: u64,
    limit: u64,
) -> Result<Vec<JournalEntry>, JotsyncError> {
    let since = filter.since;
    let offset = to_sql_int(offset);
    let limit = to_sql_int(limit);
    db.connection()
        .call(move |conn| -> Result<Vec<JournalEntry>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_COLUMNS}
                 WHERE (?1 IS NULL OR timestamp > ?1)
                 ORDER BY timestamp DESC, id ASC
                 LIMIT ?2 OFFSET ?3"
            ))?;
            let rows = stmt.query_map(params![since, limit, offset], row_to_entry)?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Total number of entries.
pub async fn count(db: &Database) -> Result<u64, JotsyncError> {
    let n = db
        .connection()
        .call(|conn| -> Result<i64, rusqlite::Error> {
            conn.query_row("SELECT COUNT(*) FROM journals", [], |row| row.get(0))
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    Ok(u64::try_from(n).unwrap_or(0))
}

/// Insert a new entry. A duplicate client identifier is a conflict.
pub async fn insert(db: &Database, entry: &NewJournalEntry) -> Result<JournalEntry, JotsyncError> {
    let entry = entry.clone();
    let client_id = entry.client_id.clone();
    let inserted = db
        .connection()
        .call(move |conn| -> Result<Option<JournalEntry>, rusqlite::Error> {
            let result = conn.execute(
                "INSERT INTO journals (client_id, prompt, text, timestamp)
                 VALUES (?1, ?2, ?3, ?4)",
                params![entry.client_id, entry.prompt, entry.text, entry.timestamp],
            );
            match result {
                Ok(_) => {
                    let id = conn.last_insert_rowid();
                    conn.query_row(
                        &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                        params![id],
                        row_to_entry,
                    )
                    .map(Some)
                }
                Err(e) if is_constraint_violation(&e) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    inserted.ok_or(JotsyncError::Conflict { client_id })
}

/// Apply the supplied patch fields and refresh `updated_at`.
pub async fn replace_fields(
    db: &Database,
    client_id: &str,
    patch: &JournalEntryPatch,
) -> Result<Option<JournalEntry>, JotsyncError> {
    let client_id = client_id.to_string();
    let prompt = patch.prompt.as_set().cloned();
    let text = patch.text.as_set().cloned();
    let timestamp = patch.timestamp.as_set().copied();
    db.connection()
        .call(move |conn| -> Result<Option<JournalEntry>, rusqlite::Error> {
            let tx = conn.transaction()?;
            let changed = tx.execute(
                "UPDATE journals
                 SET prompt = COALESCE(?1, prompt),
                     text = COALESCE(?2, text),
                     timestamp = COALESCE(?3, timestamp),
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE client_id = ?4",
                params![prompt, text, timestamp, client_id],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            let entry = select_by_client_id(&tx, &client_id)?;
            tx.commit()?;
            Ok(entry)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete an entry. Returns whether a row was removed.
pub async fn delete(db: &Database, client_id: &str) -> Result<bool, JotsyncError> {
    let client_id = client_id.to_string();
    let changed = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "DELETE FROM journals WHERE client_id = ?1",
                params![client_id],
            )
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    Ok(changed > 0)
}

/// Insert or overwrite by client identifier in one IMMEDIATE transaction.
pub async fn upsert(
    db: &Database,
    candidate: &NewJournalEntry,
) -> Result<(JournalEntry, UpsertOutcome), JotsyncError> {
    let candidate = candidate.clone();
    db.connection()
        .call(move |conn| -> Result<(JournalEntry, UpsertOutcome), rusqlite::Error> {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let existing: Option<i64> = tx
                .query_row(
                    "SELECT id FROM journals WHERE client_id = ?1",
                    params![candidate.client_id],
                    |row| row.get(0),
                )
                .optional()?;

            let (id, outcome) = match existing {
                Some(id) => {
                    tx.execute(
                        "UPDATE journals
                         SET prompt = ?1, text = ?2, timestamp = ?3,
                             updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                         WHERE id = ?4",
                        params![candidate.prompt, candidate.text, candidate.timestamp, id],
                    )?;
                    (id, UpsertOutcome::Updated)
                }
                None => {
                    tx.execute(
                        "INSERT INTO journals (client_id, prompt, text, timestamp)
                         VALUES (?1, ?2, ?3, ?4)",
                        params![
                            candidate.client_id,
                            candidate.prompt,
                            candidate.text,
                            candidate.timestamp
                        ],
                    )?;
                    (tx.last_insert_rowid(), UpsertOutcome::Created)
                }
            };

            let entry = tx.query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                row_to_entry,
            )?;
            tx.commit()?;
            Ok((entry, outcome))
        })
        .await
        .map_err(crate::database::map_tr_err)
}
