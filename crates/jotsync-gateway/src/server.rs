// SPDX-FileCopyrightText: 2026 Jotsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the journal API.

use std::future::Future;

use axum::Router;
use axum::routing::get;
use jotsync_core::{JotsyncError, JournalService};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: JournalService,
}

impl AppState {
    pub fn new(service: JournalService) -> Self {
        Self { service }
    }
}

/// Address the server binds to.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Build the full application router.
///
/// Routes:
/// - GET /, GET /health
/// - POST /api/journals, GET /api/journals
/// - GET, PUT, DELETE /api/journals/{client_id}
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health));

    let api_routes = Router::new()
        .route(
            "/api/journals",
            get(handlers::list_journals).post(handlers::create_journal),
        )
        .route(
            "/api/journals/{client_id}",
            get(handlers::get_journal)
                .put(handlers::update_journal)
                .delete(handlers::delete_journal),
        )
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind `config`'s address and serve until `shutdown` resolves.
pub async fn start_server<F>(
    config: &ServerConfig,
    state: AppState,
    shutdown: F,
) -> Result<(), JotsyncError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| JotsyncError::Internal(format!("failed to bind {addr}: {e}")))?;
    serve(listener, state, shutdown).await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), JotsyncError>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("journal API listening on {addr}");
    }

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| JotsyncError::Internal(format!("server error: {e}")))?;

    tracing::info!("journal API stopped");
    Ok(())
}
