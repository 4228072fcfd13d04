// SPDX-FileCopyrightText: 2026 Jotsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the journal service.
//!
//! Exposes [`jotsync_core::JournalService`] as a JSON REST API with
//! permissive CORS and per-request tracing.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::{ApiError, ErrorResponse};
pub use server::{AppState, ServerConfig, build_router, serve, start_server};
