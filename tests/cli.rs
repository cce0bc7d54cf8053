//! Integration tests for top-level CLI behavior.

use std::process::Command;

use serde_json::json;

fn run_acctlink(args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_acctlink");
    Command::new(bin).args(args).output().expect("failed to run acctlink binary")
}

fn write_temp(name: &str, value: &serde_json::Value) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("acctlink_cli_test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

#[test]
fn rules_subcommand_lists_pipeline_in_order() {
    let output = run_acctlink(&["rules"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("1. link-accounts"));
    assert!(stdout.contains("profile-push"));
}

#[test]
fn run_requires_an_event_path() {
    let output = run_acctlink(&["run"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("EVENT") || stderr.contains("event"));
}

#[test]
fn run_reports_missing_event_file() {
    let output = run_acctlink(&["run", "/nonexistent/event.json"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("Failed to read"));
}

#[test]
fn run_offline_links_accounts_from_seeded_profiles() {
    let event = write_temp(
        "event.json",
        &json!({
            "user": {
                "user_id": "auth0|me",
                "email": "a@x.com",
                "email_verified": true,
                "identities": [
                    {"provider": "auth0", "user_id": "me", "isSocial": false}
                ],
                "created_at": "2024-06-20T00:00:00Z",
                "updated_at": "2024-06-20T00:00:00Z"
            },
            "context": {}
        }),
    );
    let profiles = write_temp(
        "profiles.json",
        &json!([
            {
                "user_id": "auth0|me",
                "email": "a@x.com",
                "email_verified": true,
                "identities": [
                    {"provider": "auth0", "user_id": "me", "isSocial": false}
                ],
                "created_at": "2024-06-20T00:00:00Z",
                "updated_at": "2024-06-20T00:00:00Z"
            },
            {
                "user_id": "google-oauth2|g",
                "email": "a@x.com",
                "email_verified": true,
                "identities": [
                    {"provider": "google-oauth2", "user_id": "g", "isSocial": true}
                ],
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-03-01T00:00:00Z"
            }
        ]),
    );

    let output =
        run_acctlink(&["run", event.to_str().unwrap(), "--profiles", profiles.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    // The fresh subject folded into the older account.
    assert!(stdout.contains("\"primaryUser\": \"google-oauth2|g\""));
    assert!(stdout.contains("\"user_id\": \"google-oauth2|g\""));
}
