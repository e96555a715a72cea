//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against a temporary HOME so the
//! user's real config is never touched.

use std::process::{Command, Stdio};

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(home: &std::path::Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "stillroom-cli", "--"])
        .args(args)
        .env("HOME", home)
        .env_remove("STILLROOM_ENV")
        .env("RUST_LOG", "warn")
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

#[test]
fn test_session_presets() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["session", "presets"]);
    assert_eq!(code, 0, "session presets failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["durations_minutes"], serde_json::json!([3, 5, 10, 15, 20]));
    assert_eq!(parsed["ambience"].as_array().unwrap().len(), 6);
}

#[test]
fn test_config_set_get_roundtrip() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(home.path(), &["config", "set", "session.volume", "30"]);
    assert_eq!(code, 0, "config set failed");
    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "session.volume"]);
    assert_eq!(code, 0, "config get failed");
    assert_eq!(stdout.trim(), "30");
}

#[test]
fn test_config_get_unknown_key_fails() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["config", "get", "session.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_config_path_points_into_home() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["config", "path"]);
    assert_eq!(code, 0);
    assert!(stdout.trim().ends_with("config.toml"));
    assert!(stdout.contains("stillroom"));
}

#[test]
fn test_session_start_rejects_zero_duration() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["session", "start", "--duration", "0s", "--offline"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_session_start_rejects_unknown_ambience() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["session", "start", "--ambience", "thunder", "--offline"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("thunder"));
}

#[test]
fn test_offline_session_runs_to_mood() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        home.path(),
        &["session", "start", "--duration", "2s", "--offline", "--mood", "calm", "--seed", "7"],
    );
    assert_eq!(code, 0, "session start failed");
    let types: Vec<String> = stdout
        .lines()
        .filter_map(|l| serde_json::from_str::<serde_json::Value>(l).ok())
        .filter_map(|v| v["type"].as_str().map(str::to_owned))
        .collect();
    assert_eq!(types.first().map(String::as_str), Some("SessionStarted"));
    assert!(types.iter().any(|t| t == "SessionCompleted"));
    assert_eq!(types.last().map(String::as_str), Some("MoodCaptured"));
}

#[test]
fn test_history_requires_user() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["history", "list"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("user"));
}

#[test]
fn test_history_calendar_rejects_bad_month() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(home.path(), &["config", "set", "api.user_id", "u1"]);
    assert_eq!(code, 0, "config set failed");
    let (code, _, stderr) = run_cli(home.path(), &["history", "calendar", "--month", "2026-13"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("month"));
}
