//! CLI smoke tests for the pvz-cli binary
//!
//! These tests drive the binary end to end against a throwaway SQLite file.

use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Write a config that keeps logs and the database inside `dir`.
fn write_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("config.yaml");
    let yaml = format!(
        r#"home_dir: "{home}"
database:
  url: "sqlite://pvz.db?mode=rwc"
  max_conns: 1
logging:
  default:
    console_level: "off"
    file: ""
modules:
  pvz:
    default_limit: 5
"#,
        home = dir.to_string_lossy().replace('\\', "/")
    );
    std::fs::write(&path, yaml).expect("Failed to write config");
    path
}

/// Helper to run the pvz-cli binary with given arguments
fn run_pvz_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pvz-cli"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute pvz-cli")
}

fn run_json(config: &Path, args: &[&str]) -> serde_json::Value {
    let config = config.to_string_lossy().to_string();
    let mut full = vec!["--config", config.as_str()];
    full.extend_from_slice(args);
    let output = run_pvz_cli(&full);
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn test_cli_help_command() {
    let output = run_pvz_cli(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pvz-cli"), "Should contain binary name");
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    for sub in ["create-point", "open-reception", "add-product", "report", "check"] {
        assert!(stdout.contains(sub), "Should contain '{sub}' subcommand");
    }
    assert!(stdout.contains("--config"), "Should mention config option");
}

#[test]
fn test_cli_version_command() {
    let output = run_pvz_cli(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pvz-cli"), "Should contain binary name");
    assert!(
        stdout.chars().any(|c| c.is_ascii_digit()),
        "Should contain version numbers"
    );
}

#[test]
fn test_cli_invalid_command() {
    let output = run_pvz_cli(&["invalid-command"]);
    assert!(!output.status.success(), "Invalid command should fail");
}

#[test]
fn test_cli_rejects_unknown_role() {
    let output = run_pvz_cli(&["create-point", "--role", "admin", "--city", "Москва"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown role"), "stderr: {stderr}");
}

#[test]
fn test_cli_check_with_config() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(tmp.path());

    let out = run_json(&config, &["check"]);
    assert_eq!(out["status"], "ok");
    assert!(tmp.path().join("pvz.db").exists(), "database file should be created");
}

#[test]
fn test_cli_reception_flow() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(tmp.path());

    let point = run_json(
        &config,
        &["create-point", "--role", "moderator", "--city", "Казань"],
    );
    assert_eq!(point["city"], "Казань");
    let point_id = point["id"].as_str().unwrap().to_string();

    let reception = run_json(
        &config,
        &["open-reception", "--role", "employee", "--point-id", &point_id],
    );
    assert_eq!(reception["status"], "in_progress");

    for product_type in ["электроника", "обувь"] {
        let product = run_json(
            &config,
            &[
                "add-product",
                "--role",
                "employee",
                "--point-id",
                &point_id,
                "--type",
                product_type,
            ],
        );
        assert_eq!(product["type"], product_type);
    }

    let deleted = run_json(
        &config,
        &["delete-last-product", "--role", "employee", "--point-id", &point_id],
    );
    assert_eq!(deleted["outcome"], "deleted");

    let closed = run_json(
        &config,
        &["close-reception", "--role", "employee", "--point-id", &point_id],
    );
    assert_eq!(closed["status"], "close");

    let report = run_json(&config, &["report", "--page", "0"]);
    let report = report.as_array().unwrap();
    assert_eq!(report.len(), 1);
    let products = report[0]["receptions"][0]["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["type"], "электроника");
}

#[test]
fn test_cli_role_gate() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(tmp.path());
    let config = config.to_string_lossy().to_string();

    let output = run_pvz_cli(&[
        "--config",
        &config,
        "create-point",
        "--role",
        "employee",
        "--city",
        "Москва",
    ]);
    assert!(!output.status.success(), "employees cannot create points");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("requires role 'moderator'"), "stderr: {stderr}");
}
