//! CLI tests for the `pb` binary
//!
//! Only non-interactive commands are exercised; `ask` and `demo` need a
//! terminal.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pb(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pb").expect("pb binary");
    cmd.current_dir(temp_dir.path())
        .env("XDG_DATA_HOME", temp_dir.path().join("data"))
        .env("XDG_CONFIG_HOME", temp_dir.path().join("config"));
    cmd
}

#[test]
fn test_help_lists_commands() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    pb(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("demo"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_config_prints_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    pb(&temp_dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("close-delay-ms: 200"))
        .stdout(predicate::str::contains("pending-notice: A data entry is pending"));
}

#[test]
fn test_config_reads_explicit_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("custom.yml");
    fs::write(&path, "prompt:\n  close-delay-ms: 50\ntheme:\n  border: red\n").unwrap();

    pb(&temp_dir)
        .arg("config")
        .arg("--config")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("close-delay-ms: 50"))
        .stdout(predicate::str::contains("border: red"));
}

#[test]
fn test_config_reads_local_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join(".promptbox.yml"), "notices:\n  duration-ms: 1234\n").unwrap();

    pb(&temp_dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("duration-ms: 1234"));
}

#[test]
fn test_missing_explicit_config_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    pb(&temp_dir)
        .args(["config", "--config", "does-not-exist.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load"));
}

#[test]
fn test_ask_rejects_unsupported_field() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    pb(&temp_dir)
        .args(["ask", "Name?", "--field", "onclick=x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported field option"));
}
