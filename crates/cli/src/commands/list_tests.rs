// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::commands::testing::TestContext;

#[test]
fn test_empty_queue_text() {
    let ctx = TestContext::offline();
    assert_eq!(
        run_impl(&ctx.outbox, OutputFormat::Text).unwrap(),
        "queue is empty"
    );
}

#[test]
fn test_text_lists_in_replay_order() {
    let ctx = TestContext::offline();
    let a = ctx.queue("/a");
    let b = ctx.queue("/b");

    let text = run_impl(&ctx.outbox, OutputFormat::Text).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with(&format!("#{} POST /a (create_item)", a)));
    assert!(lines[1].starts_with(&format!("#{} POST /b (create_item)", b)));
}

#[test]
fn test_json_output() {
    let ctx = TestContext::offline();
    let id = ctx.queue("/items");

    let json = run_impl(&ctx.outbox, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], id);
    assert_eq!(items[0]["method"], "POST");
    assert_eq!(items[0]["endpoint"], "/items");
    assert_eq!(items[0]["kind"], "create_item");
}

#[test]
fn test_unreadable_store_is_an_error() {
    let (outbox, _temp) = TestContext::unwritable();
    assert!(run_impl(&outbox, OutputFormat::Text).is_err());
}
