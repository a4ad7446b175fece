// integration tests for the config command

use crate::common::*;
use std::fs;

#[test]
fn test_config_path_honors_override() {
    let dir = test_dir();
    let path = dir.path().join("custom.json");

    let output = run_rcond(
        &["--config", path.to_str().unwrap(), "config", "path"],
        dir.path(),
    );

    assert!(output.status.success());
    assert_eq!(stdout_of(&output).trim(), path.to_str().unwrap());
}

#[test]
fn test_config_path_from_env() {
    let dir = test_dir();
    let output = run_rcond(&["config", "path"], dir.path());

    assert!(output.status.success());
    assert!(stdout_of(&output).trim().ends_with("config.json"));
}

#[test]
fn test_config_init_then_verify() {
    let dir = test_dir();

    let output = run_rcond(&["--no-json", "config", "init"], dir.path());
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(dir.path().join("config.json").exists());

    let output = run_rcond(&["--no-json", "config", "verify"], dir.path());
    assert!(output.status.success(), "stdout: {}", stdout_of(&output));
    assert!(stdout_of(&output).contains("Configuration is valid"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let dir = test_dir();
    write_file(dir.path(), "config.json", "{ rules: [] }");

    let output = run_rcond(&["--no-json", "config", "init"], dir.path());
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr_of(&output).contains("--force"));

    let output = run_rcond(&["--no-json", "config", "init", "--force"], dir.path());
    assert!(output.status.success());
    let content = fs::read_to_string(dir.path().join("config.json")).unwrap();
    assert!(content.contains("groceries"));
}

#[test]
fn test_config_verify_reports_errors() {
    let dir = test_dir();
    write_file(
        dir.path(),
        "config.json",
        r#"{ rules: [
            { name: "a", when: { currency: "EUR" } },
            { name: "a", when: { time: ["after", "7pm"] } },
        ] }"#,
    );

    let output = run_rcond(&["--no-json", "config", "verify"], dir.path());

    assert_eq!(output.status.code(), Some(5));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("2 error(s)"), "stdout: {}", stdout);
    assert!(stdout.contains("  - rules[1]: duplicate rule name 'a'"));
    assert!(stdout.contains("  - rules[1].when.time: invalid time '7pm'"));
}

#[test]
fn test_config_verify_json() {
    let dir = test_dir();
    write_file(dir.path(), "config.json", r#"{ rules: [{ when: {} }] }"#);

    let output = run_rcond(&["--json", "config", "verify"], dir.path());

    assert_eq!(output.status.code(), Some(5));
    let result = json_result(&output);
    assert_eq!(result["valid"], false);
    assert_eq!(result["errors"].as_array().unwrap().len(), 2);
}

#[test]
fn test_config_verify_missing_file() {
    let dir = test_dir();
    let output = run_rcond(&["--no-json", "config", "verify"], dir.path());
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr_of(&output).contains("not found"));
}

#[test]
fn test_config_show_and_default() {
    let dir = test_dir();
    let output = run_rcond(&["config", "default"], dir.path());
    assert!(output.status.success());
    let config: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(config["rules"].as_array().unwrap().len(), 4);

    // missing file shows the empty config
    let output = run_rcond(&["config", "show"], dir.path());
    assert!(output.status.success());
    let config: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(config["rules"], serde_json::json!([]));
    assert_eq!(config["settings"]["firstMatch"], false);
}

#[test]
fn test_completions_generate() {
    let dir = test_dir();
    let output = run_rcond(&["completions", "bash"], dir.path());
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("rcond"));
}

#[test]
fn test_config_quiet_suppresses_output() {
    let dir = test_dir();
    write_file(dir.path(), "config.json", "{ rules: [] }");

    for sub in ["path", "show", "default"] {
        let output = run_rcond(&["--quiet", "config", sub], dir.path());
        assert!(output.status.success(), "config {} failed", sub);
        assert!(stdout_of(&output).is_empty(), "config {} printed output", sub);
    }

    // errors are still reported
    write_file(dir.path(), "config.json", "{ rules: [");
    let output = run_rcond(&["--quiet", "config", "show"], dir.path());
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr_of(&output).starts_with("error: "));
}
