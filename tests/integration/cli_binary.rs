//! Binary-level tests: help output, argument errors and exit codes.

use std::process::{Command, Output};
use tempfile::TempDir;

fn prax(args: &[&str]) -> (Output, TempDir) {
    let config_home = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_prax"))
        .env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("PRAX_API__URL")
        .env_remove("PRAX_API__TOKEN")
        .args(args)
        .output()
        .unwrap();
    (output, config_home)
}

#[test]
fn test_help_lists_command_groups() {
    let (output, _home) = prax(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["list", "describe", "submit", "retry", "terminate", "logs", "allow", "create"] {
        assert!(stdout.contains(command), "help should mention {}", command);
    }
}

#[test]
fn test_list_help_names_entities() {
    let (output, _home) = prax(&["list", "--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for entity in ["pipelines", "tasks", "builds", "routes", "notebooks"] {
        assert!(stdout.contains(entity));
    }
}

#[test]
fn test_unknown_kind_fails_to_parse() {
    let (output, _home) = prax(&["submit", "notebook", "x"]);
    assert!(!output.status.success());
}

#[test]
fn test_unreachable_api_exits_with_error_block() {
    let (output, _home) = prax(&[
        "--quiet",
        "--api-url",
        "http://127.0.0.1:9",
        "describe",
        "user",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error fetching user:"));
}

#[test]
fn test_invalid_api_url_is_config_error() {
    let (output, _home) = prax(&["--quiet", "--api-url", "ftp://prax", "list", "tasks"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error loading configuration:"));
}
