//! Command-line tests
//!
//! Run the built binary against a temporary data directory.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn solver(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("symptom-solver").unwrap();
    cmd.arg("--data-dir").arg(dir.path());
    cmd
}

fn seed(dir: &TempDir) {
    for (id, name) in [("G001", "Fever"), ("G002", "Cough"), ("G003", "Rash")] {
        solver(dir).args(["symptom", "add", id, name]).assert().success();
    }
    solver(dir)
        .args(["rule", "save", "Flu", "-s", "G001", "-s", "G002", "--new"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created rule for 'Flu'"));
    solver(dir)
        .args(["rule", "save", "Measles", "-s", "G001", "G003"])
        .assert()
        .success();
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("symptom-solver")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("diagnose"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn test_symptom_add_normalizes_and_lists() {
    let dir = TempDir::new().unwrap();
    solver(&dir)
        .args(["symptom", "add", " g020 ", "  Stomach cramps "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added symptom 'Stomach cramps' (ID: G020)"));

    solver(&dir)
        .args(["symptom", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("G020"))
        .stdout(predicate::str::contains("Stomach cramps"));

    assert!(dir.path().join("symptoms.json").exists());
}

#[test]
fn test_missing_data_dir_is_bootstrapped() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("kb");
    Command::cargo_bin("symptom-solver")
        .unwrap()
        .arg("--data-dir")
        .arg(&data_dir)
        .args(["rule", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No disease rules defined"));

    assert_eq!(
        std::fs::read_to_string(data_dir.join("symptoms.json")).unwrap().trim(),
        "[]"
    );
    assert_eq!(
        std::fs::read_to_string(data_dir.join("rules.json")).unwrap().trim(),
        "{}"
    );
}

#[test]
fn test_symptom_add_rejects_overlong_id() {
    let dir = TempDir::new().unwrap();
    let long_id = "G".repeat(500);
    solver(&dir)
        .args(["symptom", "add", long_id.as_str(), "Fever"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Symptom id exceeds maximum length"));
    assert!(!dir.path().join("symptoms.json").exists());
}

#[test]
fn test_existing_lower_case_ids_are_used_as_stored() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("symptoms.json"),
        r#"[{"id": "g001", "name": "Fever"}, {"id": "G002", "name": "Cough"}]"#,
    )
    .unwrap();

    solver(&dir)
        .args(["rule", "save", "Flu", "-s", "g001", "-s", "G002"])
        .assert()
        .success()
        .stderr(predicate::str::contains("does not exist").not());
    solver(&dir)
        .args(["diagnose", "-s", "g001", "--threshold", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MATCH    Flu: 50.00%"));
    solver(&dir)
        .args(["symptom", "delete", "g001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted symptom 'Fever' (ID: g001)"));

    let symptoms = std::fs::read_to_string(dir.path().join("symptoms.json")).unwrap();
    assert!(!symptoms.contains("g001"));
    solver(&dir)
        .args(["--format", "tsv", "rule", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Flu\tG002\n"));
}

#[test]
fn test_duplicate_symptom_fails() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    solver(&dir)
        .args(["symptom", "add", "G001", "Other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_diagnose_text_output() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    solver(&dir)
        .args(["diagnose", "-s", " G002 ", "--threshold", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MATCH    Flu: 50.00%"))
        .stdout(predicate::str::contains("no match Measles: 0.00%"));
}

#[test]
fn test_diagnose_json_output() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    let output = solver(&dir)
        .args(["--format", "json", "diagnose", "-s", "G001", "-s", "G003"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let outcomes = value["outcomes"].as_array().unwrap();
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[1]["disease"], "Measles");
    assert_eq!(outcomes[1]["matched"], true);
    assert_eq!(outcomes[1]["percentage"], 100.0);
}

#[test]
fn test_diagnose_rejects_bad_threshold() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    solver(&dir)
        .args(["diagnose", "-s", "G001", "--threshold", "150"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 0 and 100"));
}

#[test]
fn test_diagnose_without_rules_fails() {
    let dir = TempDir::new().unwrap();
    solver(&dir).args(["symptom", "add", "G001", "Fever"]).assert().success();
    solver(&dir)
        .args(["diagnose", "-s", "G001"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No disease rules"));
}

#[test]
fn test_diagnose_unknown_symptoms_fail() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    solver(&dir)
        .args(["diagnose", "-s", "G999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Select at least one symptom"));
}

#[test]
fn test_symptom_delete_updates_rules() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    solver(&dir)
        .args(["symptom", "delete", "G002"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted symptom 'Cough'"));

    solver(&dir)
        .args(["--format", "tsv", "rule", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Flu\tG001\n"));
}

#[test]
fn test_rule_show_and_delete() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    solver(&dir)
        .args(["rule", "show", "Flu"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fever"))
        .stdout(predicate::str::contains("Cough"));

    solver(&dir)
        .args(["rule", "delete", "Flu"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted disease 'Flu'"));

    solver(&dir)
        .args(["rule", "show", "Flu"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not found"));
}

#[test]
fn test_data_dir_from_environment() {
    let dir = TempDir::new().unwrap();
    Command::cargo_bin("symptom-solver")
        .unwrap()
        .env("SYMPTOM_SOLVER_DATA_DIR", dir.path())
        .args(["symptom", "add", "G001", "Fever"])
        .assert()
        .success();
    assert!(std::fs::read_to_string(dir.path().join("symptoms.json"))
        .unwrap()
        .contains("Fever"));
}

#[test]
fn test_corrupt_data_warns_on_stderr() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    std::fs::write(dir.path().join("rules.json"), "[1, 2").unwrap();
    solver(&dir)
        .args(["rule", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning:"))
        .stdout(predicate::str::contains("No disease rules defined"));
}
