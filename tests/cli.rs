//! Integration tests for top-level CLI behavior.

use std::path::PathBuf;
use std::process::Command;

fn run_reqforge(args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_reqforge");
    Command::new(bin)
        .args(args)
        .env_remove("REQFORGE_RECORD")
        .env_remove("REQFORGE_REPLAY")
        .env_remove("REQFORGE_MODEL_ID")
        .output()
        .expect("failed to run reqforge binary")
}

fn fixture(name: &str, content: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("reqforge_cli_test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn model_falls_back_to_default() {
    let output = run_reqforge(&["model", "--model-id", "gpt-3.5-turbo"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "gpt-4o\n");
}

#[test]
fn model_is_lowercased() {
    let output = run_reqforge(&["model", "--model-id", "GPT-4o-Mini"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "gpt-4o-mini\n");
}

#[test]
fn help_lists_subcommands() {
    let output = run_reqforge(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    for command in ["model", "invoke", "check", "validate-solution", "validate-id"] {
        assert!(stdout.contains(command), "help is missing {command}");
    }
}

#[test]
fn validate_solution_reports_missing_categories() {
    let path = fixture(
        "missing.json",
        r#"{"name": "n", "description": "d", "created_on": "2024-01-01T00:00:00Z",
            "brd": {"max_count": 1}}"#,
    );
    let output = run_reqforge(&["validate-solution", path.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!output.status.success());
    assert!(stdout.contains("prd: required"));
    assert!(stdout.contains("nfr: required"));
    assert!(stdout.contains("uir: required"));
    assert!(!stdout.contains("brd"));
}

#[test]
fn validate_solution_with_v2_schema() {
    let limit = r#"{"min_count": 1, "max_count": 30}"#;
    let body = format!(
        r#"{{"name": "n", "description": "d", "created_on": "2024-01-01T00:00:00Z",
            "brd": {limit}, "prd": {limit}, "nfr": {limit}, "uir": {limit}}}"#
    );
    let path = fixture("v2.json", &body);
    let output = run_reqforge(&["validate-solution", path.to_str().unwrap(), "--schema", "v2"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("(v2)"));
}

#[test]
fn validate_id_rejects_missing_id() {
    let path = fixture("noid.json", "{}");
    let output = run_reqforge(&["validate-id", path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("id: required"));
}

#[test]
fn invalid_subcommand_exits_with_error() {
    let output = run_reqforge(&["nonsense"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("unrecognized subcommand"));
}
