// SPDX-FileCopyrightText: 2026 Jotsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `jotsync serve` command implementation.
//!
//! Opens the journal database, wires the journal service into the HTTP
//! gateway, and serves until SIGINT/SIGTERM. The database is checkpointed
//! on the way out.

use std::sync::Arc;

use jotsync_config::JotsyncConfig;
use jotsync_core::{JotsyncError, JournalService, PageLimits, StorageAdapter};
use jotsync_gateway::{AppState, ServerConfig, start_server};
use jotsync_storage::SqliteStorage;
use tracing::{error, info};

use crate::shutdown;

/// Page limits taken from the `[journal]` section.
pub fn page_limits(config: &JotsyncConfig) -> PageLimits {
    PageLimits {
        default_page_size: config.journal.default_page_size,
    }
}

/// Run the `jotsync serve` command.
pub async fn run_serve(config: JotsyncConfig) -> Result<(), JotsyncError> {
    init_tracing(&config.server.log_level);
    info!(version = env!("CARGO_PKG_VERSION"), "starting jotsync");

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;
    info!(path = %config.storage.database_path, "storage initialized");

    let service = JournalService::new(storage.clone()).with_page_limits(page_limits(&config));
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    let token = shutdown::install_signal_handler();
    let served = start_server(&server_config, AppState::new(service), token.cancelled_owned()).await;
    if let Err(e) = &served {
        error!(error = %e, "server exited with error");
    }

    storage.close().await?;
    info!("storage closed, goodbye");
    served
}

/// Initialize the tracing subscriber. `RUST_LOG` overrides `log_level`.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("jotsync={log_level},tower_http={log_level},warn"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
