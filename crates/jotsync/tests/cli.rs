// SPDX-FileCopyrightText: 2026 Jotsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tests that run the compiled `jotsync` binary.

use std::io::Write;
use std::process::Command;

fn jotsync() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_jotsync"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn config_subcommand_prints_effective_config() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[server]\nport = 9123\n").unwrap();

    let output = jotsync()
        .arg("--config")
        .arg(file.path())
        .arg("config")
        .output()
        .unwrap();

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("port = 9123"), "{stdout}");
    assert!(stdout.contains("default_page_size = 100"), "{stdout}");
}

#[test]
fn unknown_config_key_exits_with_diagnostic() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[storage]\ndatabse_path = \"x.db\"\n").unwrap();

    let output = jotsync()
        .arg("--config")
        .arg(file.path())
        .arg("config")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("databse_path"), "{stderr}");
    assert!(stderr.contains("database_path"), "{stderr}");
}

#[test]
fn missing_config_file_exits_with_error() {
    let output = jotsync()
        .args(["--config", "/nonexistent/jotsync.toml", "config"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("config file not found"), "{stderr}");
}

#[test]
fn version_flag() {
    let output = jotsync().arg("--version").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("jotsync "), "{stdout}");
}

#[test]
fn doctor_reports_invalid_config_as_failed_check() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[server]\nport = 0\n").unwrap();

    let output = jotsync()
        .arg("--config")
        .arg(file.path())
        .args(["doctor", "--plain"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("[FAIL] Configuration"), "{stdout}");
    assert!(stdout.contains("server.port must not be 0"), "{stdout}");
    assert!(stdout.contains("skipped: configuration is invalid"), "{stdout}");
}
