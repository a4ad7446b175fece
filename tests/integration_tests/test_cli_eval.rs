// integration tests for the eval command

use crate::common::*;

fn eval(spec: &str, extra: &[&str]) -> std::process::Output {
    let dir = test_dir();
    let receipt = write_receipt(dir.path());
    let mut args = vec!["--no-json"];
    args.extend(extra);
    args.extend(["eval", spec, "--receipt", receipt.to_str().unwrap()]);
    run_rcond(&args, dir.path())
}

#[test]
fn test_eval_match_exits_zero() {
    let output = eval(r#"{ "currency": "EUR" }"#, &[]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
    assert_eq!(stdout_of(&output).trim(), "true");
}

#[test]
fn test_eval_no_match_exits_two() {
    let output = eval(r#"{ "currency": "USD" }"#, &[]);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout_of(&output).trim(), "false");
}

#[test]
fn test_eval_weekend_evening_bakery() {
    let spec = r#"{ "$and": [
        { "date": ["weekday", "==", "sun"] },
        { "time": ["after", "18:00"] },
        { "placeType": "bakery" },
        { "header": ["table", "12"] },
        { "$not": { "header": ["receipt copy", true] } }
    ] }"#;
    let output = eval(spec, &[]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
}

#[test]
fn test_eval_quiet_prints_nothing() {
    let output = eval(r#"{ "amount": [">", 40] }"#, &["--quiet"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout_of(&output).is_empty());
}

#[test]
fn test_eval_json_output() {
    let dir = test_dir();
    let receipt = write_receipt(dir.path());
    let output = run_rcond(
        &[
            "--json",
            "eval",
            r#"{ "$or": [] }"#,
            "--receipt",
            receipt.to_str().unwrap(),
        ],
        dir.path(),
    );

    assert_eq!(output.status.code(), Some(2));
    let result = json_result(&output);
    assert_eq!(result["matched"], false);
    assert_eq!(result["condition"], "any()");
}

#[test]
fn test_eval_receipt_from_stdin() {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let dir = test_dir();
    let mut child = Command::new(rcond_binary_path())
        .args(["--no-json", "eval", r#"{ "paymentMethod": "CASH" }"#, "-r", "-"])
        .env("RCOND_CONFIG", dir.path().join("config.json"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn rcond");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(br#"{ paymentMethod: "CASH" }"#)
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
}

#[test]
fn test_eval_missing_receipt() {
    let dir = test_dir();
    let output = run_rcond(
        &["--no-json", "eval", r#"{ "currency": "EUR" }"#, "-r", "/nonexistent.json"],
        dir.path(),
    );
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr_of(&output).starts_with("error: "));
}

#[test]
fn test_eval_invalid_spec_beats_receipt() {
    let output = eval(r#"{ "amount": [">"] }"#, &[]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_eval_tolerates_null_fields_and_utc_timestamp() {
    let dir = test_dir();
    let receipt = write_file(
        dir.path(),
        "receipt.json",
        r#"{
            "amount": { "value": 12.0, "currency": null },
            "timestamp": "2024-03-17T19:30:00.000Z",
            "paymentMethod": "DEBIT",
            "header": null,
            "place": null
        }"#,
    );

    let spec = r#"{ "$and": [
        { "paymentMethod": "DEBIT" },
        { "date": ["weekday", "==", "sun"] },
        { "$not": { "currency": "EUR" } }
    ] }"#;
    let output = run_rcond(
        &["--no-json", "eval", spec, "--receipt", receipt.to_str().unwrap()],
        dir.path(),
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
}
