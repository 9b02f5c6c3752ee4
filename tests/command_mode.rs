//! Integration tests for the command-line front end

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn run_command(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_cellbook"))
        // Tests must be deterministic and not depend on a user's config.toml.
        .arg("--no-config")
        .args(args)
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn temp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("cellbook_test_{}_{}", nanos, name))
}

#[test]
fn test_basic_arithmetic() {
    let (stdout, _, code) = run_command(&["-c", "5 + 3"]);
    assert_eq!(stdout.trim(), "8");
    assert_eq!(code, 0);
}

#[test]
fn test_precedence_and_parentheses() {
    let (stdout, _, code) = run_command(&["-c", "2 + 3 * (4 - 1) / 2"]);
    assert_eq!(stdout.trim(), "6.5");
    assert_eq!(code, 0);
}

#[test]
fn test_auto_prepend_equals() {
    let (stdout1, _, _) = run_command(&["-c", "10 + 5"]);
    let (stdout2, _, _) = run_command(&["-c", "=10 + 5"]);
    assert_eq!(stdout1, stdout2);
}

#[test]
fn test_command_reads_cells_set_first() {
    let (stdout, _, code) = run_command(&["-s", "A1=10", "-s", "A2=20", "-c", "A1+A2"]);
    assert_eq!(stdout.trim(), "30");
    assert_eq!(code, 0);
}

#[test]
fn test_syntax_error_exit_code() {
    let (stdout, _, code) = run_command(&["-c", "SUM(A1)"]);
    assert_eq!(stdout.trim(), "#ERROR");
    assert_eq!(code, 1);
}

#[test]
fn test_division_by_zero() {
    let (stdout, _, code) = run_command(&["-c", "1/0"]);
    assert_eq!(stdout.trim(), "#DIV0");
    assert_eq!(code, 1);
}

#[test]
fn test_invalid_reference_in_set_fails() {
    let (_, stderr, code) = run_command(&["-s", "A0=1"]);
    assert!(stderr.starts_with("Error:"));
    assert_eq!(code, 1);
}

#[test]
fn test_markdown_output_scalar() {
    let output_file = temp_path("scalar.md");
    let output = output_file.to_str().unwrap();

    let (_, stderr, code) = run_command(&["-c", "2 * 512", "-o", output]);
    assert_eq!(code, 0);
    assert!(stderr.contains("Result written to"));

    let content = fs::read_to_string(&output_file).unwrap();
    assert!(content.contains("| 1 | 1024 |"));

    fs::remove_file(&output_file).ok();
}

#[test]
fn test_sheet_is_printed_as_markdown() {
    let (stdout, _, code) = run_command(&["-s", "A1=3", "-s", "B1==A1*A1"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("| 1 | 3 | 9 |"));
}

#[test]
fn test_edits_are_saved_and_reloaded() {
    let book = temp_path("book.cbk");
    let path = book.to_str().unwrap();

    let (_, stderr, code) = run_command(&[
        path,
        "-s",
        "A1=4",
        "-s",
        "A2==A1+1",
        "--style",
        "A2@bold=true",
    ]);
    assert_eq!(code, 0, "{}", stderr);

    let content = fs::read_to_string(&book).unwrap();
    assert!(content.contains(r#"A2: ="A1+1""#));
    assert!(content.contains("A2 @bold: true"));

    let (stdout, _, code) = run_command(&[path, "-c", "A2*10"]);
    assert_eq!(stdout.trim(), "50");
    assert_eq!(code, 0);

    fs::remove_file(&book).ok();
}

#[test]
fn test_unknown_sheet_fails() {
    let (_, stderr, code) = run_command(&["--sheet", "Missing", "-c", "1"]);
    assert!(stderr.contains("Missing"));
    assert_eq!(code, 1);
}
