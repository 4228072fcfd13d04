// SPDX-FileCopyrightText: 2026 Jotsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `jotsync doctor` command implementation.
//!
//! Runs diagnostic checks against the configuration and the journal database.

use std::io::IsTerminal;
use std::path::Path;
use std::time::{Duration, Instant};

use jotsync_config::{ConfigError, JotsyncConfig};
use jotsync_core::{JotsyncError, JournalStore, PluginAdapter, StorageAdapter};
use jotsync_storage::SqliteStorage;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `jotsync doctor` command.
///
/// With `--plain` (or when stdout is not a terminal) output is uncolored.
/// An invalid configuration fails its check and skips the database checks.
pub async fn run_doctor(
    loaded: Result<JotsyncConfig, Vec<ConfigError>>,
    plain: bool,
) -> Result<(), JotsyncError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let mut results = vec![check_config(&loaded)];
    match &loaded {
        Ok(config) => results.extend(check_database(config).await),
        Err(_) => results.push(CheckResult::new(
            "Database",
            CheckStatus::Warn,
            "skipped: configuration is invalid",
            Instant::now(),
        )),
    }

    println!();
    println!("  jotsync doctor");
    println!("  {}", "-".repeat(50));
    for result in &results {
        println!("{}", format_result(result, use_color));
    }
    println!();

    let issues = results
        .iter()
        .filter(|r| r.status != CheckStatus::Pass)
        .count();
    if issues > 0 {
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    Ok(())
}

fn format_result(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red(), result.message.red()),
        };
        format!(
            "    {symbol} {:<20} {message} ({duration_ms}ms)",
            result.name
        )
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!(
            "    {tag} {:<20} {} ({duration_ms}ms)",
            result.name, result.message
        )
    }
}

/// Report the outcome of configuration loading, listing every error.
fn check_config(loaded: &Result<JotsyncConfig, Vec<ConfigError>>) -> CheckResult {
    let start = Instant::now();
    match loaded {
        Ok(_) => CheckResult::new("Configuration", CheckStatus::Pass, "valid", start),
        Err(errors) => {
            let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
            CheckResult::new(
                "Configuration",
                CheckStatus::Fail,
                format!("{} error(s): {}", errors.len(), details.join("; ")),
                start,
            )
        }
    }
}

/// Open the journal database and check reachability and integrity.
///
/// A missing file is only a warning because `serve` creates it.
async fn check_database(config: &JotsyncConfig) -> Vec<CheckResult> {
    let start = Instant::now();
    let db_path = &config.storage.database_path;

    if !Path::new(db_path).exists() {
        return vec![CheckResult::new(
            "Database",
            CheckStatus::Warn,
            format!("not found: {db_path} (will be created on first run)"),
            start,
        )];
    }

    let storage = match SqliteStorage::open(config.storage.clone()).await {
        Ok(storage) => storage,
        Err(e) => {
            return vec![CheckResult::new(
                "Database",
                CheckStatus::Fail,
                format!("open failed: {e}"),
                start,
            )];
        }
    };

    let mut results = Vec::with_capacity(2);
    let reachable = match storage.health_check().await {
        Ok(_) => match storage.count().await {
            Ok(n) => CheckResult::new(
                "Database",
                CheckStatus::Pass,
                format!("connected ({n} journals)"),
                start,
            ),
            Err(e) => CheckResult::new(
                "Database",
                CheckStatus::Fail,
                format!("query failed: {e}"),
                start,
            ),
        },
        Err(e) => CheckResult::new(
            "Database",
            CheckStatus::Fail,
            format!("query failed: {e}"),
            start,
        ),
    };
    results.push(reachable);

    let start = Instant::now();
    let integrity = match storage.integrity_check().await {
        Ok(lines) if lines.len() == 1 && lines[0] == "ok" => {
            CheckResult::new("DB integrity", CheckStatus::Pass, "ok", start)
        }
        Ok(lines) => CheckResult::new(
            "DB integrity",
            CheckStatus::Fail,
            format!("{} problem(s): {}", lines.len(), lines.join("; ")),
            start,
        ),
        Err(e) => CheckResult::new(
            "DB integrity",
            CheckStatus::Fail,
            format!("check failed: {e}"),
            start,
        ),
    };
    results.push(integrity);

    if let Err(e) = storage.close().await {
        tracing::warn!(error = %e, "failed to close database after doctor checks");
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use jotsync_config::model::StorageConfig;
    use tempfile::tempdir;

    fn config_with_db(path: &str) -> JotsyncConfig {
        JotsyncConfig {
            storage: StorageConfig {
                database_path: path.to_string(),
                ..StorageConfig::default()
            },
            ..JotsyncConfig::default()
        }
    }

    #[tokio::test]
    async fn missing_database_is_a_warning() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("absent.db");
        let results = check_database(&config_with_db(db_path.to_str().unwrap())).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, CheckStatus::Warn);
        assert!(!db_path.exists(), "doctor must not create the database");
    }

    #[tokio::test]
    async fn existing_database_passes_both_checks() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("present.db");
        let config = config_with_db(db_path.to_str().unwrap());

        let storage = SqliteStorage::open(config.storage.clone()).await.unwrap();
        storage.close().await.unwrap();
        drop(storage);

        let results = check_database(&config).await;
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.status == CheckStatus::Pass), "{results:?}");
        assert!(results[0].message.contains("0 journals"));
    }

    #[tokio::test]
    async fn garbage_file_fails() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("garbage.db");
        std::fs::write(&db_path, b"this is not a sqlite database, just text padding it out")
            .unwrap();
        let results = check_database(&config_with_db(db_path.to_str().unwrap())).await;
        assert_eq!(results[0].status, CheckStatus::Fail);
    }

    #[test]
    fn invalid_config_fails_with_details() {
        let loaded = jotsync_config::load_and_validate_str("[server]\nport = 0\n");
        let result = check_config(&loaded);
        assert_eq!(result.status, CheckStatus::Fail);
        assert!(result.message.starts_with("1 error(s)"), "{}", result.message);
        assert!(result.message.contains("port"), "{}", result.message);
    }

    #[test]
    fn valid_config_passes() {
        let result = check_config(&Ok(JotsyncConfig::default()));
        assert_eq!(result.status, CheckStatus::Pass);
    }

    #[test]
    fn plain_output_has_status_tags() {
        let result = CheckResult {
            name: "Database".to_string(),
            status: CheckStatus::Warn,
            message: "not found".to_string(),
            duration: Duration::from_millis(3),
        };
        let line = format_result(&result, false);
        assert!(line.contains("[WARN]"));
        assert!(line.contains("not found"));
        assert!(line.contains("(3ms)"));
    }
}
