// SPDX-FileCopyrightText: 2026 Jotsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the journal REST API.
//!
//! Handles `/api/journals` (upsert, list), `/api/journals/{client_id}`
//! (get, partial update, delete) and the `/` and `/health` liveness probes.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use jotsync_core::types::{
    JournalEntry, JournalEntryPatch, JournalPage, ListParams, NewJournalEntry,
};

use crate::error::ApiError;
use crate::server::AppState;

/// Response body for `GET /`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Response body for `DELETE /api/journals/{client_id}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "AI Journal API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// POST /api/journals
///
/// Creates the entry, or overwrites the one already stored under the same
/// `client_id`.
pub async fn create_journal(
    State(state): State<AppState>,
    payload: Result<Json<NewJournalEntry>, JsonRejection>,
) -> Result<Json<JournalEntry>, ApiError> {
    let Json(candidate) = payload?;
    let entry = state.service.upsert(candidate).await?;
    Ok(Json(entry))
}

/// GET /api/journals?since=&skip=&limit=
pub async fn list_journals(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<JournalPage>, ApiError> {
    let Query(params) = params?;
    let page = state.service.list(&params).await?;
    Ok(Json(page))
}

/// GET /api/journals/{client_id}
pub async fn get_journal(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> Result<Json<JournalEntry>, ApiError> {
    Ok(Json(state.service.get(&client_id).await?))
}

/// PUT /api/journals/{client_id}
///
/// Only fields present in the body are written.
pub async fn update_journal(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    payload: Result<Json<JournalEntryPatch>, JsonRejection>,
) -> Result<Json<JournalEntry>, ApiError> {
    let Json(patch) = payload?;
    let entry = state.service.partial_update(&client_id, patch).await?;
    Ok(Json(entry))
}

/// DELETE /api/journals/{client_id}
pub async fn delete_journal(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.service.delete(&client_id).await?;
    Ok(Json(DeleteResponse {
        success: true,
        message: "Journal deleted successfully".to_string(),
    }))
}
