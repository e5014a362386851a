//! CLI Integration Tests
//!
//! Runs the sheetmap binary through assert_cmd.

#![cfg(not(coverage))]
#![allow(deprecated)] // Command::cargo_bin deprecation - no stable replacement yet

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn sheetmap() -> Command {
    Command::cargo_bin("sheetmap").unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// HELP AND VERSION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_cli_help() {
    sheetmap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sheetmap"))
        .stdout(predicate::str::contains("COMMANDS"))
        .stdout(predicate::str::contains("ROW RANGES"));
}

#[test]
fn test_cli_version() {
    sheetmap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sheetmap"));
}

#[test]
fn test_subcommand_help() {
    sheetmap()
        .args(["sample", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Export the built-in book catalogue"));

    sheetmap()
        .args(["books", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--end-offset"));
}

#[test]
fn test_no_subcommand_fails() {
    sheetmap().assert().failure();
}

// ═══════════════════════════════════════════════════════════════════════════
// SAMPLE → INSPECT / BOOKS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_sample_writes_workbook() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("books.xlsx");

    sheetmap()
        .arg("sample")
        .arg(&output)
        .args(["--title", "My Books"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Export Complete"))
        .stdout(predicate::str::contains("3 rows written"));

    assert!(output.exists());
}

#[test]
fn test_inspect_shows_title_and_headers() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("books.xlsx");
    sheetmap()
        .arg("sample")
        .arg(&output)
        .args(["-t", "My Books"])
        .assert()
        .success();

    sheetmap()
        .arg("inspect")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("My Books"))
        .stdout(predicate::str::contains("Stocked At"))
        .stdout(predicate::str::contains("Why? Volume 3"));
}

#[test]
fn test_inspect_json_honours_range() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("books.xlsx");
    sheetmap().arg("sample").arg(&output).assert().success();

    // rows 2..=3 of a sheet whose last row is 4
    sheetmap()
        .arg("inspect")
        .arg(&output)
        .args(["--start", "2", "--end-offset", "-1", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"index\": 2"))
        .stdout(predicate::str::contains("\"index\": 3"))
        .stdout(predicate::str::contains("\"index\": 4").not())
        .stdout(predicate::str::contains("\"1.0\""));
}

#[test]
fn test_books_imports_records_as_json() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("books.xlsx");
    sheetmap()
        .arg("sample")
        .arg(&output)
        .args(["--pattern", "yyyy-MM-dd"])
        .assert()
        .success();

    sheetmap()
        .arg("books")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Why? Volume 1\""))
        .stdout(predicate::str::contains("\"price\": 7.36"))
        .stdout(predicate::str::contains("T00:00:00"))
        .stdout(predicate::str::contains("skipped").not());
}

#[test]
fn test_books_reports_skipped_fields() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("books.xlsx");
    sheetmap().arg("sample").arg(&output).assert().success();

    // starting at the header row: "Book ID", "Price" and "Stocked At" do not coerce
    sheetmap()
        .arg("books")
        .arg(&output)
        .args(["--start", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 field(s) skipped"));
}

#[test]
fn test_bad_theme_fails() {
    let dir = TempDir::new().unwrap();
    let theme = dir.path().join("theme.yaml");
    std::fs::write(&theme, "header:\n  fill: not-a-colour\n").unwrap();

    sheetmap()
        .arg("sample")
        .arg(dir.path().join("books.xlsx"))
        .arg("--theme")
        .arg(&theme)
        .assert()
        .failure();
}

// ═══════════════════════════════════════════════════════════════════════════
// ERROR PATHS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_inspect_missing_file() {
    sheetmap()
        .args(["inspect", "/nonexistent/books.xlsx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_books_missing_file() {
    sheetmap()
        .args(["books", "/nonexistent/books.xlsx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("importing"));
}

#[test]
fn test_books_not_a_workbook() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("notes.txt");
    std::fs::write(&file, "plain text").unwrap();

    sheetmap()
        .arg("books")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Workbook error"));
}
