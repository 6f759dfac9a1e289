//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. Every test
//! gets its own temporary home directory, so no real user state is touched.

use std::path::Path;
use std::process::Command;

/// Run a CLI command against an isolated home and return output.
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "loyalty-cli", "--"])
        .args(args)
        .env("HOME", home)
        .env("LOYALTY_ENV", "dev")
        .output()
        .expect("failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli_success(home: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "CLI command failed: {args:?}\nstderr: {stderr}");
    stdout
}

#[test]
fn test_status_defaults_to_guest() {
    let home = tempfile::TempDir::new().unwrap();
    let stdout = run_cli_success(home.path(), &["status"]);
    assert!(stdout.contains("Guest"), "unexpected status: {stdout}");
    assert!(stdout.contains("0 points"), "unexpected status: {stdout}");
    assert!(stdout.contains("toward level 2"), "unexpected status: {stdout}");
}

#[test]
fn test_section_event_awards_once_per_session() {
    let home = tempfile::TempDir::new().unwrap();

    let first = run_cli_success(home.path(), &["event", "section", "intro"]);
    assert!(first.contains("+5 points"), "first view paid: {first}");

    let second = run_cli_success(home.path(), &["event", "section", "intro"]);
    assert!(
        !second.contains("+5 points"),
        "second view must not pay: {second}"
    );

    let status = run_cli_success(home.path(), &["status"]);
    assert!(status.contains("5 points"), "unexpected status: {status}");
}

#[test]
fn test_status_json_is_machine_readable() {
    let home = tempfile::TempDir::new().unwrap();
    run_cli_success(home.path(), &["event", "cta", "Book"]);

    let stdout = run_cli_success(home.path(), &["status", "--json"]);
    let snap: serde_json::Value = serde_json::from_str(&stdout).expect("status --json output");
    assert_eq!(snap["points"], 10);
    assert_eq!(snap["level"], 1);
    assert_eq!(snap["display_name"], "Guest");
}

#[test]
fn test_quest_status_json_tracks_steps() {
    let home = tempfile::TempDir::new().unwrap();
    run_cli_success(home.path(), &["quest", "step", "pick"]);

    let stdout = run_cli_success(home.path(), &["quest", "status", "--json"]);
    let quest: serde_json::Value = serde_json::from_str(&stdout).expect("quest status --json");
    assert_eq!(quest["steps"]["pick"], true);
    assert_eq!(quest["steps"]["request"], false);
    assert_eq!(quest["complete"], false);
}

#[test]
fn test_unknown_quest_step_is_an_error() {
    let home = tempfile::TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["quest", "step", "dance"]);
    assert_ne!(code, 0, "bad step must fail");
    assert!(stderr.contains("unknown quest step"), "stderr: {stderr}");
}

#[test]
fn test_session_clear_rearms_rewards() {
    let home = tempfile::TempDir::new().unwrap();
    run_cli_success(home.path(), &["event", "section", "intro"]);

    let cleared = run_cli_success(home.path(), &["session", "clear"]);
    assert!(cleared.contains("session cleared"), "stdout: {cleared}");

    let again = run_cli_success(home.path(), &["event", "section", "intro"]);
    assert!(again.contains("+5 points"), "new session must pay: {again}");

    let status = run_cli_success(home.path(), &["status"]);
    assert!(status.contains("10 points"), "unexpected status: {status}");
}

#[test]
fn test_config_show_prints_defaults_without_file() {
    let home = tempfile::TempDir::new().unwrap();
    let stdout = run_cli_success(home.path(), &["config", "show"]);
    assert!(stdout.contains("xp_per_level = 100"), "stdout: {stdout}");
    assert!(stdout.contains("quest_bonus_points = 20"), "stdout: {stdout}");
}
