//! Binary tests
//!
//! Runs the `cmdbind` binary end to end: exit codes, output formats and the
//! log file.

mod common;

use common::cmdbind_cmd;
use predicates::prelude::*;

// =============================================================================
// Help
// =============================================================================

#[test]
fn test_help_flag_exits_zero() {
    cmdbind_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("greet"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_no_arguments_prints_help() {
    cmdbind_cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_help_command_shows_group_help() {
    cmdbind_cmd()
        .args(["help", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Print one setting"))
        .stdout(predicate::str::contains("Change one setting"));
}

#[test]
fn test_version_flag() {
    cmdbind_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// =============================================================================
// Commands
// =============================================================================

#[test]
fn test_config_get_prints_value() {
    cmdbind_cmd()
        .args(["config", "get", "editor"])
        .assert()
        .success()
        .stdout("vim\n");
}

#[test]
fn test_config_alias_set_reports_previous_value() {
    cmdbind_cmd()
        .args(["cfg", "set", "pager", "more"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"previous\": \"less\""));
}

#[test]
fn test_greet_with_optional_argument_and_flag() {
    cmdbind_cmd()
        .args(["greet", "ada"])
        .assert()
        .success()
        .stdout("Hello, ada!\n");

    cmdbind_cmd()
        .args(["greet", "ada", "Hi", "--shout"])
        .assert()
        .success()
        .stdout("HI, ADA!\n");
}

#[test]
fn test_sum_adds_variadic_arguments() {
    cmdbind_cmd()
        .args(["sum", "1", "2", "3"])
        .assert()
        .success()
        .stdout("6\n");
}

#[test]
fn test_sum_accepts_negative_numbers() {
    cmdbind_cmd()
        .args(["sum", "1", "-2"])
        .assert()
        .success()
        .stdout("-1\n");
}

#[test]
fn test_completions_for_bash() {
    cmdbind_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cmdbind"))
        .stdout(predicate::str::contains("greet"));
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_unknown_sub_command_exits_with_usage_code() {
    cmdbind_cmd()
        .args(["config", "nope"])
        .assert()
        .code(64)
        .stderr(predicate::str::contains("unknown command 'nope' in 'cmdbind config'"))
        .stderr(predicate::str::contains("cmdbind config --help"));
}

#[test]
fn test_missing_argument_exits_with_usage_code() {
    cmdbind_cmd()
        .arg("greet")
        .assert()
        .code(64)
        .stderr(predicate::str::contains("missing required argument"));
}

#[test]
fn test_handler_failure_exits_with_software_code() {
    cmdbind_cmd()
        .args(["sum", "1", "x"])
        .assert()
        .code(70)
        .stderr(predicate::str::contains("'x' is not an integer"));
}

#[cfg(unix)]
#[test]
fn test_non_utf8_argument_is_a_usage_error() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    cmdbind_cmd()
        .arg("greet")
        .arg(OsString::from_vec(vec![0x66, 0x80, 0x6f]))
        .assert()
        .code(64)
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn test_group_help_omits_help_sub_command() {
    cmdbind_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Print one setting"))
        .stdout(predicate::str::contains("Print this message or the help").not());
}

#[test]
fn test_unknown_config_key_is_a_handler_failure() {
    cmdbind_cmd()
        .args(["config", "get", "shell"])
        .assert()
        .code(70)
        .stderr(predicate::str::contains("unknown key 'shell'"));
}

// =============================================================================
// Output and logging
// =============================================================================

#[test]
fn test_json_output_wraps_data_with_command_path() {
    let output = cmdbind_cmd()
        .env("CMDBIND_OUTPUT", "json")
        .args(["sum", "4", "5"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["command"], "cmdbind sum");
    assert_eq!(json["data"], 9);
}

#[test]
fn test_json_errors_carry_category_and_code() {
    let output = cmdbind_cmd()
        .env("CMDBIND_OUTPUT", "json")
        .args(["config", "nope"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(64));

    let json: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(json["category"], "invalid_input");
    assert_eq!(json["exit_code"], 64);
}

#[test]
fn test_failures_are_written_to_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("cmdbind.log");

    cmdbind_cmd()
        .env("CMDBIND_LOG", &log)
        .args(["sum", "1", "x"])
        .assert()
        .code(70);

    let contents = std::fs::read_to_string(&log).unwrap();
    assert!(contents.contains("ERROR"));
    assert!(contents.contains("'x' is not an integer"));
}

#[test]
fn test_help_is_not_logged() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("cmdbind.log");

    cmdbind_cmd()
        .env("CMDBIND_LOG", &log)
        .arg("--help")
        .assert()
        .success();

    let contents = std::fs::read_to_string(&log).unwrap_or_default();
    assert!(!contents.contains("ERROR"));
}
