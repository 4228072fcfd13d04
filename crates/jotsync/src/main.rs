// SPDX-FileCopyrightText: 2026 Jotsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! jotsync - journal entry sync service.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod doctor;
mod serve;
mod shutdown;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use jotsync_config::JotsyncConfig;
use jotsync_core::JotsyncError;

/// jotsync - journal entry sync service.
#[derive(Parser, Debug)]
#[command(name = "jotsync", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard lookup paths.
    #[arg(long, short, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Start the journal API server (default).
    Serve,
    /// Run diagnostic checks against the configuration and database.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn load_config(path: Option<&Path>) -> Result<JotsyncConfig, Vec<jotsync_config::ConfigError>> {
    match path {
        Some(path) => jotsync_config::load_and_validate_path(path),
        None => jotsync_config::load_and_validate(),
    }
}

fn load_config_or_exit(path: Option<&Path>) -> JotsyncConfig {
    match load_config(path) {
        Ok(config) => config,
        Err(errors) => {
            jotsync_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

fn render_config(config: &JotsyncConfig) -> Result<String, JotsyncError> {
    toml::to_string_pretty(config)
        .map_err(|e| JotsyncError::Config(format!("failed to serialize config: {e}")))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config_path = cli.config.as_deref();

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::run_serve(load_config_or_exit(config_path)).await,
        // Doctor reports a broken config as a failed check instead of exiting.
        Commands::Doctor { plain } => doctor::run_doctor(load_config(config_path), plain).await,
        Commands::Config => {
            render_config(&load_config_or_exit(config_path)).map(|rendered| print!("{rendered}"))
        }
    };

    if let Err(e) = result {
        eprintln!("jotsync: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the stats epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["jotsync"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.command.unwrap_or(Commands::Serve), Commands::Serve);
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["jotsync", "doctor", "--plain", "--config", "/tmp/j.toml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/j.toml")));
        assert_eq!(cli.command, Some(Commands::Doctor { plain: true }));
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["jotsync", "migrate"]).is_err());
    }

    #[test]
    fn rendered_config_round_trips() {
        let config = JotsyncConfig::default();
        let rendered = render_config(&config).unwrap();
        assert!(rendered.contains("[server]"));
        assert!(rendered.contains("database_path = \"data/journals.db\""));
        let reparsed = jotsync_config::load_and_validate_str(&rendered).unwrap();
        assert_eq!(reparsed, config);
    }

    #[test]
    fn missing_config_file_is_reported() {
        let errors = load_config(Some(Path::new("/nonexistent/jotsync.toml"))).unwrap_err();
        assert!(matches!(
            errors[0],
            jotsync_config::ConfigError::FileNotFound { .. }
        ));
    }
}
