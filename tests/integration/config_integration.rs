//! Configuration files picked up by the binary.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

#[test]
fn test_global_config_file_is_used() {
    let config_home = TempDir::new().unwrap();
    let prax_dir = config_home.path().join("prax");
    fs::create_dir_all(&prax_dir).unwrap();
    fs::write(
        prax_dir.join("config.toml"),
        "[api]\nurl = \"http://127.0.0.1:9\"\ntimeout_secs = 5\n",
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_prax"))
        .env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("PRAX_API__URL")
        .args(["--quiet", "list", "pipelines"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error fetching pipelines:"));
}

#[test]
fn test_explicit_config_with_invalid_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prax.toml");
    fs::write(&path, "[output]\nlimit = 0\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_prax"))
        .env("XDG_CONFIG_HOME", dir.path())
        .arg("--config")
        .arg(&path)
        .args(["list", "tasks"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error loading configuration:"));
    assert!(stderr.contains("output.limit"));
}

#[test]
fn test_missing_explicit_config() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_prax"))
        .env("XDG_CONFIG_HOME", dir.path())
        .arg("--config")
        .arg(dir.path().join("nope.toml"))
        .args(["describe", "user"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Configuration file not found"));
}
