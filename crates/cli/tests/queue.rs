// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;
use common::*;

#[test]
fn enqueue_prints_id() {
    let state = state_dir();
    outbox(&state)
        .args(["enqueue", "POST", "/items", "--data", r#"{"content":"buy milk"}"#])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^queued #\d+\n$").unwrap());
}

#[test]
fn enqueue_creates_queue_in_state_dir() {
    let state = state_dir();
    enqueue(&state, "/items", "{}");
    assert!(state.path().join("queue.db").exists());
}

#[test]
fn list_shows_actions_in_order() {
    let state = state_dir();
    let first = enqueue(&state, "/items", r#"{"content":"a"}"#);
    let second = enqueue(&state, "/contacts", r#"{"name":"b"}"#);

    outbox(&state)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "#{} POST /items (post_items)",
            first
        )))
        .stdout(predicate::str::contains(format!(
            "#{} POST /contacts (post_contacts)",
            second
        )));
}

#[test]
fn list_json_round_trips_payload() {
    let state = state_dir();
    enqueue(&state, "/items", r#"{"content":"buy milk"}"#);

    let output = outbox(&state).args(["list", "-o", "json"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["payload"]["content"], "buy milk");
    assert_eq!(value[0]["method"], "POST");
}

#[test]
fn empty_queue_list() {
    let state = state_dir();
    outbox(&state)
        .arg("list")
        .assert()
        .success()
        .stdout("queue is empty\n");
}

#[test]
fn explicit_kind_is_kept() {
    let state = state_dir();
    outbox(&state)
        .args(["enqueue", "put", "/contacts/3", "--kind", "update_contact"])
        .assert()
        .success();

    outbox(&state)
        .arg("list")
        .assert()
        .stdout(predicate::str::contains("PUT /contacts/3 (update_contact)"));
}

#[test]
fn status_reports_offline_and_pending() {
    let state = state_dir();
    enqueue(&state, "/a", "{}");
    enqueue(&state, "/b", "{}");

    outbox(&state)
        .arg("status")
        .assert()
        .success()
        .stdout("online: no\npending: 2\nsyncing: no\n");
}

#[test]
fn status_json() {
    let state = state_dir();
    enqueue(&state, "/a", "{}");

    let output = outbox(&state).args(["status", "-o", "json"]).output().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["is_online"], false);
    assert_eq!(value["pending_count"], 1);
}

#[test]
fn clear_empties_queue() {
    let state = state_dir();
    enqueue(&state, "/a", "{}");

    outbox(&state)
        .arg("clear")
        .assert()
        .success()
        .stdout("cleared 1 queued action\n");
    outbox(&state)
        .arg("list")
        .assert()
        .stdout("queue is empty\n");
}

#[test]
fn ids_are_not_reused_after_clear() {
    let state = state_dir();
    let before = enqueue(&state, "/a", "{}");
    outbox(&state).arg("clear").assert().success();
    assert!(enqueue(&state, "/b", "{}") > before);
}

#[test]
fn unknown_method_is_rejected() {
    let state = state_dir();
    outbox(&state)
        .args(["enqueue", "FETCH", "/items"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("FETCH"));
    assert!(!state.path().join("queue.db").exists());
}

#[test]
fn invalid_json_is_rejected() {
    let state = state_dir();
    outbox(&state)
        .args(["enqueue", "POST", "/items", "--data", "{oops"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error: invalid payload"));
}

#[test]
fn unwritable_state_dir_is_not_queued() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();

    outbox_at(&blocker.join("state"))
        .args(["enqueue", "POST", "/items"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("action was not queued"));
}

#[test]
fn invalid_base_url_is_config_error() {
    let state = state_dir();
    outbox(&state)
        .env("OUTBOX_BASE_URL", "ftp://example.com")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config error"))
        .stderr(predicate::str::contains("hint:"));
}
