// integration tests for the check and keys commands

use crate::common::*;

#[test]
fn test_check_valid_spec_text() {
    let dir = test_dir();
    let output = run_rcond(
        &["--no-json", "check", r#"{ "$not": { "currency": "EUR" } }"#],
        dir.path(),
    );

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("not(currency == \"EUR\")"), "stdout: {}", stdout);
    assert!(stdout.contains("\"$not\""));
}

#[test]
fn test_check_json_output() {
    let dir = test_dir();
    let output = run_rcond(
        &["--json", "check", r#"{ amount: ["gte", 10] }"#],
        dir.path(),
    );

    assert!(output.status.success());
    let result = json_result(&output);
    assert_eq!(result["valid"], true);
    assert_eq!(result["spec"], serde_json::json!({ "amount": [">=", 10.0] }));
}

#[test]
fn test_check_spec_from_file() {
    let dir = test_dir();
    let spec = write_file(dir.path(), "spec.json5", "{ placeType: 'bakery' }");
    let arg = format!("@{}", spec.display());

    let output = run_rcond(&["--json", "check", &arg], dir.path());
    assert!(output.status.success());
}

#[test]
fn test_check_unknown_key_suggests() {
    let dir = test_dir();
    let output = run_rcond(
        &["--no-json", "check", r#"{ "$and": [{ "curency": "EUR" }] }"#],
        dir.path(),
    );

    assert_eq!(output.status.code(), Some(3));
    let stderr = stderr_of(&output);
    assert!(stderr.contains("$and[0]"), "stderr: {}", stderr);
    assert!(stderr.contains("did you mean: currency"), "stderr: {}", stderr);
}

#[test]
fn test_check_error_json() {
    let dir = test_dir();
    let output = run_rcond(
        &["--json", "check", r#"{ "time": ["after", "25:00"] }"#],
        dir.path(),
    );

    assert_eq!(output.status.code(), Some(3));
    let error = json_error(&output);
    assert_eq!(error["code"], -32003);
    assert_eq!(error["data"]["details"], "time");
}

#[test]
fn test_check_empty_spec() {
    let dir = test_dir();
    let output = run_rcond(&["--no-json", "check", "{}"], dir.path());
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr_of(&output).contains("empty condition spec"));
}

#[test]
fn test_keys_lists_every_key() {
    let dir = test_dir();
    let output = run_rcond(&["--no-json", "keys"], dir.path());

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    let keys: Vec<&str> = stdout.lines().collect();
    assert_eq!(keys.len(), 11);
    assert!(keys.contains(&"$or"));
    assert!(keys.contains(&"paymentMethod"));
}
