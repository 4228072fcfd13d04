// SPDX-FileCopyrightText: 2026 Jotsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./jotsync.toml` > `~/.config/jotsync/jotsync.toml` > `/etc/jotsync/jotsync.toml`
//! with environment variable overrides via `JOTSYNC_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::JotsyncConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/jotsync/jotsync.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_PATH: &str = "jotsync.toml";

/// Per-user config file under the XDG config directory, if one is known.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("jotsync").join("jotsync.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/jotsync/jotsync.toml` (system-wide)
/// 3. `~/.config/jotsync/jotsync.toml` (user XDG config)
/// 4. `./jotsync.toml` (local directory)
/// 5. `JOTSYNC_*` environment variables
pub fn load_config() -> Result<JotsyncConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<JotsyncConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(JotsyncConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<JotsyncConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(JotsyncConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(JotsyncConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `JOTSYNC_STORAGE_DATABASE_PATH` must map to
/// `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("JOTSYNC_")
        .filter(|key| section_of(&key.as_str().to_ascii_lowercase()).is_some())
        .map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}

const SECTIONS: [&str; 3] = ["server", "storage", "journal"];

/// The config section an env key belongs to, if any.
fn section_of(key: &str) -> Option<(&'static str, &str)> {
    SECTIONS.iter().find_map(|section| {
        key.strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
            .map(|rest| (*section, rest))
    })
}

/// Map a lowercased, prefix-stripped env var name to its dotted config key.
pub(crate) fn map_env_key(key: &str) -> String {
    match section_of(key) {
        Some((section, rest)) => format!("{section}.{rest}"),
        None => key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("server_port"), "server.port");
        assert_eq!(map_env_key("server_log_level"), "server.log_level");
        assert_eq!(map_env_key("storage_database_path"), "storage.database_path");
        assert_eq!(map_env_key("journal_default_page_size"), "journal.default_page_size");
    }

    #[test]
    fn unrelated_keys_pass_through() {
        assert_eq!(map_env_key("other"), "other");
        assert_eq!(map_env_key("serverport"), "serverport");
    }

    #[test]
    fn only_section_keys_are_recognized() {
        assert_eq!(section_of("storage_wal_mode"), Some(("storage", "wal_mode")));
        assert_eq!(section_of("config"), None);
        assert_eq!(section_of("log"), None);
    }
}
