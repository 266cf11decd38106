//! Tests for the `chain-options` binary.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

fn chain_options_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_chain-options"))
}

fn options_file(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("options.toml");
    fs::write(&path, content).expect("Failed to write options file");
    (temp_dir, path)
}

const OPTIONS: &str = r#"
[[option]]
name = "duck"
default = "waddle waddle"
transform = "to_s"

[[option]]
name = "books"
incremental = true
invalid = "default"
"#;

#[test]
fn test_help_lists_subcommands() {
    let output = chain_options_cmd()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("check"));
    assert!(stdout.contains("apply"));
}

#[test]
fn test_check_prints_options_and_warnings() {
    let (_dir, path) = options_file(OPTIONS);
    let output = chain_options_cmd()
        .arg("check")
        .arg(&path)
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("duck (default: \"waddle waddle\", transform: :to_s, invalid: raise)"));
    assert!(stdout.contains("books (incremental: true, invalid: default)"));
    assert!(stdout.contains("warning: The options invalid: default, incremental: true are incompatible"));
}

#[test]
fn test_apply_prints_resulting_values() {
    let (_dir, path) = options_file(OPTIONS);
    let output = chain_options_cmd()
        .arg("apply")
        .arg(&path)
        .args(["--set", "duck=42", "--set", "books=[\"Momo\"]", "--set", "books=\"Hobbit\""])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("stdout should be JSON");

    assert_eq!(json["duck"], serde_json::json!("42"));
    assert_eq!(json["books"], serde_json::json!([["Momo"], ["Hobbit"]]));
}

#[test]
fn test_apply_unknown_option_fails() {
    let (_dir, path) = options_file(OPTIONS);
    let output = chain_options_cmd()
        .arg("apply")
        .arg(&path)
        .args(["--set", "goose=1"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("There is no option registered called goose."));
}

#[test]
fn test_missing_file_fails() {
    let output = chain_options_cmd()
        .arg("check")
        .arg("/nonexistent/options.toml")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read option file"));
}

const NUMBERS: &str = r#"
[[option]]
name = "numbers"
default = 666
validate = "positive"
invalid = "default"

[[option]]
name = "evens"
filter = "even"
"#;

#[test]
fn test_check_resolves_builtin_predicates() {
    let (_dir, path) = options_file(NUMBERS);
    let output = chain_options_cmd()
        .arg("check")
        .arg(&path)
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("numbers (default: 666, validate: :positive, invalid: default)"));
    assert!(stdout.contains("evens (filter: :even, invalid: raise)"));
}

#[test]
fn test_apply_runs_builtin_predicates() {
    let (_dir, path) = options_file(NUMBERS);
    let output = chain_options_cmd()
        .arg("apply")
        .arg(&path)
        .args(["--set", "numbers=-3", "--set", "evens=[1,2,3,4]"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("stdout should be JSON");

    assert_eq!(json["numbers"], serde_json::json!(666));
    assert_eq!(json["evens"], serde_json::json!([2, 4]));
}

#[test]
fn test_unknown_method_reported_once() {
    let (_dir, path) = options_file("[[option]]\nname = \"numbers\"\nvalidate = \"no_number_5\"\n");
    let output = chain_options_cmd()
        .arg("check")
        .arg(&path)
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Option registration failed: Option numbers refers to unknown validate method 'no_number_5'"));
    assert_eq!(stderr.matches("no_number_5").count(), 1);
}
