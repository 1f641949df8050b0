// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use tempfile::TempDir;

#[test]
fn test_lock_is_exclusive() {
    let temp = TempDir::new().unwrap();
    let path = config::lock_path(temp.path());

    let held = acquire_lock(&path).unwrap();
    let err = acquire_lock(&path).unwrap_err();
    assert!(matches!(err, Error::WorkerRunning(ref p) if p.ends_with("watch.lock")));

    drop(held);
    acquire_lock(&path).unwrap();
}

#[test]
fn test_lock_in_missing_directory_is_io_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing").join("watch.lock");
    assert!(matches!(acquire_lock(&path).unwrap_err(), Error::Io(_)));
}

#[tokio::test]
async fn test_cancelled_token_ends_wait() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    tokio::time::timeout(std::time::Duration::from_secs(1), wait_for_shutdown(&cancel))
        .await
        .unwrap();
}
