//! Integration tests for the norma43 CLI.
//!
//! These tests run the actual binary and verify output against expected files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;

/// Get path to test data file
fn test_data_path(filename: &str) -> String {
    format!("tests/data/{}", filename)
}

/// Run the binary with the given arguments and return stdout
fn run_cli(args: &[&str]) -> String {
    let mut cmd = Command::cargo_bin("norma43").unwrap();
    let assert = cmd.args(args).assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

#[test]
fn test_statement_default_templates() {
    let output = run_cli(&["--in", &test_data_path("statement.n43")]);
    let expected = fs::read_to_string(test_data_path("expected_statement.txt")).unwrap();

    assert_eq!(output, expected);
}

#[test]
fn test_statement_from_stdin() {
    let input = fs::read_to_string(test_data_path("statement.n43")).unwrap();
    let expected = fs::read_to_string(test_data_path("expected_statement.txt")).unwrap();

    let mut cmd = Command::cargo_bin("norma43").unwrap();
    cmd.write_stdin(input).assert().success().stdout(expected);
}

#[test]
fn test_multi_account_with_crlf_line_endings() {
    let output = run_cli(&[
        "--in",
        &test_data_path("multi_account.n43"),
        "--header-tpl",
        ".AccountNumber,.InitialBalance",
        "--line-tpl",
        ".Amount,.Balance,.ExtraInformation",
        "--footer-tpl",
        ".CreditAmount,.FinalBalance",
        "--sep",
        ";",
    ]);

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 11);
    assert_eq!(lines[0], "3333444412;2463.43");
    assert_eq!(lines[6], "50000.00;2301.59");
    assert_eq!(lines[7], "0200051332;0.00");
    assert_eq!(lines[8], "1500.00;1500.00;NOMINA MARZO");
    assert_eq!(lines[9], "-45.50;1454.50;RECIBO LUZ IBERDROLA CLIENTES");
    assert_eq!(lines[10], "1500.00;1454.50");
}

#[test]
fn test_filter_line_out() {
    let output = run_cli(&[
        "--in",
        &test_data_path("statement.n43"),
        "--filter-line-out",
        "INSURANCE",
        "--header-tpl",
        "",
        "--footer-tpl",
        "",
        "--line-tpl",
        ".Amount,.Balance",
    ]);

    assert_eq!(output, "-23.99 2439.44\n-138.57 2300.87\n-1.00 2299.87\n");
}

#[test]
fn test_filter_negative_leaves_only_header_and_footer() {
    let output = run_cli(&[
        "--in",
        &test_data_path("multi_account.n43"),
        "--filter-negative",
        "--header-tpl",
        ".BankCode",
        "--line-tpl",
        ".Amount,.Balance",
        "--footer-tpl",
        ".BankCode",
    ]);

    assert_eq!(output, "1111\n1111\n2100\n1500.00 1500.00\n2100\n");
}

#[test]
fn test_day_month_year_output() {
    let output = run_cli(&[
        "--in",
        &test_data_path("statement.n43"),
        "--time-format",
        "DMY",
        "--header-tpl",
        ".StartDate,.EndDate",
        "--line-tpl",
        "",
        "--footer-tpl",
        "",
    ]);

    assert_eq!(output, "03/02/2020 10/02/2020\n");
}

#[test]
fn test_trim_option_strips_padding() {
    let input = fs::read_to_string(test_data_path("statement.n43")).unwrap();
    let padded: String = input.lines().map(|l| format!("  {}   \n", l)).collect();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(padded.as_bytes()).unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let output = run_cli(&["--in", &path, "--trim"]);
    let expected = fs::read_to_string(test_data_path("expected_statement.txt")).unwrap();
    assert_eq!(output, expected);

    let mut cmd = Command::cargo_bin("norma43").unwrap();
    cmd.args(["--in", path.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid line code"));
}

#[test]
fn test_missing_footer_error() {
    let input = fs::read_to_string(test_data_path("statement.n43")).unwrap();
    let truncated: Vec<&str> = input.lines().take(11).collect();

    let mut cmd = Command::cargo_bin("norma43").unwrap();
    cmd.write_stdin(truncated.join("\n"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed document"));
}

#[test]
fn test_missing_file_error() {
    let mut cmd = Command::cargo_bin("norma43").unwrap();
    cmd.args(["--in", "nonexistent.n43"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("I/O error"));
}

#[test]
fn test_invalid_pattern_error() {
    let mut cmd = Command::cargo_bin("norma43").unwrap();
    let input = test_data_path("statement.n43");
    cmd.args(["--in", input.as_str(), "--filter-line-in", "("])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid include pattern"));
}

#[test]
fn test_unknown_template_field_error() {
    let mut cmd = Command::cargo_bin("norma43").unwrap();
    let input = test_data_path("statement.n43");
    cmd.args([
        "--in",
        input.as_str(),
        "--line-tpl",
        ".Amount,.Whatever",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Unknown movement field"));
}
