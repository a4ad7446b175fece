// integration tests for the classify command

use crate::common::*;

const RULES: &str = r#"{
    // evaluated in order
    rules: [
        { name: "cheap", when: { amount: ["<", 10] } },
        { name: "food", when: { placeTypeCategory: "food" }, category: "groceries" },
        { name: "card", when: { "$or": [{ paymentMethod: "DEBIT" }, { paymentMethod: "CREDIT" }] }, category: "card" },
    ],
}"#;

#[test]
fn test_classify_lists_matching_rules() {
    let dir = test_dir();
    write_file(dir.path(), "config.json", RULES);
    let receipt = write_receipt(dir.path());

    let output = run_rcond(
        &["--no-json", "classify", "--receipt", receipt.to_str().unwrap()],
        dir.path(),
    );

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let stdout = stdout_of(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["food -> groceries", "card -> card"]);
}

#[test]
fn test_classify_json_category() {
    let dir = test_dir();
    write_file(dir.path(), "config.json", RULES);
    let receipt = write_receipt(dir.path());

    let output = run_rcond(
        &["--json", "classify", "--receipt", receipt.to_str().unwrap()],
        dir.path(),
    );

    let result = json_result(&output);
    assert_eq!(result["category"], "groceries");
    assert_eq!(result["matched"].as_array().unwrap().len(), 2);
}

#[test]
fn test_classify_first_match_setting() {
    let dir = test_dir();
    let rules = RULES.replacen("rules: [", "settings: { firstMatch: true }, rules: [", 1);
    write_file(dir.path(), "config.json", &rules);
    let receipt = write_receipt(dir.path());

    let output = run_rcond(
        &["--no-json", "classify", "--receipt", receipt.to_str().unwrap()],
        dir.path(),
    );

    assert_eq!(stdout_of(&output).trim(), "food -> groceries");
}

#[test]
fn test_classify_without_rule_file_matches_nothing() {
    let dir = test_dir();
    let receipt = write_receipt(dir.path());

    let output = run_rcond(
        &["--no-json", "classify", "--receipt", receipt.to_str().unwrap()],
        dir.path(),
    );

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout_of(&output).is_empty());
}

#[test]
fn test_classify_invalid_rule_file() {
    let dir = test_dir();
    write_file(
        dir.path(),
        "config.json",
        r#"{ rules: [{ name: "x", when: { amont: [">", 1] } }] }"#,
    );
    let receipt = write_receipt(dir.path());

    let output = run_rcond(
        &["--no-json", "classify", "--receipt", receipt.to_str().unwrap()],
        dir.path(),
    );

    assert_eq!(output.status.code(), Some(5));
    assert!(stderr_of(&output).contains("amont"));
}
