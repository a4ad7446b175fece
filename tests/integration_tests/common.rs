// shared utilities for integration tests

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

pub fn rcond_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_rcond"))
}

/// run rcond with the given args, isolated from any user rule file
pub fn run_rcond(args: &[&str], dir: &Path) -> Output {
    Command::new(rcond_binary_path())
        .args(args)
        .env("RCOND_CONFIG", dir.join("config.json"))
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run rcond")
}

pub fn test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create test directory")
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}

/// a Sunday evening card payment at a bakery
pub fn write_receipt(dir: &Path) -> PathBuf {
    write_file(
        dir,
        "receipt.json",
        r#"{
            "amount": { "value": 42.5, "currency": "EUR" },
            "timestamp": "2024-03-17T19:30:00",
            "paymentMethod": "DEBIT",
            "header": ["Boulangerie Dupont", "Table: 12"],
            "place": { "type": "bakery", "typeCategory": "food" }
        }"#,
    )
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// parse JSON-RPC output and return its result object
pub fn json_result(output: &Output) -> serde_json::Value {
    let stdout = stdout_of(output);
    let json: serde_json::Value = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("invalid JSON output ({}): {}", e, stdout));
    assert_eq!(json["jsonrpc"], "2.0");
    json["result"].clone()
}

/// parse JSON-RPC output and return its error object
pub fn json_error(output: &Output) -> serde_json::Value {
    let stdout = stdout_of(output);
    let json: serde_json::Value = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("invalid JSON output ({}): {}", e, stdout));
    json["error"].clone()
}
