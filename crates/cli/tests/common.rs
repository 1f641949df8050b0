// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::sync::{Arc, Mutex};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// Nothing listens on the discard port, so connections are refused at once.
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

/// `outbox` with an isolated state directory and an unreachable backend.
pub fn outbox(state: &TempDir) -> Command {
    outbox_at(state.path())
}

/// `outbox` with `state` as its state directory and an unreachable backend.
pub fn outbox_at(state: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("outbox");
    cmd.env("OUTBOX_STATE_DIR", state)
        .env("OUTBOX_BASE_URL", UNREACHABLE)
        .env_remove("OUTBOX_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

/// A fresh state directory with a short request timeout.
pub fn state_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("config.toml"), "timeout_secs = 2\n").unwrap();
    temp
}

/// Take the worker lock in `state` the way a running `outbox watch` does.
/// The lock is released when the returned file is dropped.
pub fn hold_worker_lock(state: &TempDir) -> std::fs::File {
    use fs2::FileExt;

    let lock = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(state.path().join("watch.lock"))
        .unwrap();
    lock.try_lock_exclusive().unwrap();
    lock
}

/// Queue a POST and return the printed id.
pub fn enqueue(state: &TempDir, endpoint: &str, data: &str) -> i64 {
    let output = outbox(state)
        .args(["enqueue", "POST", endpoint, "--data", data])
        .output()
        .unwrap();
    assert!(output.status.success());
    String::from_utf8_lossy(&output.stdout)
        .trim()
        .trim_start_matches("queued #")
        .parse()
        .unwrap()
}

/// A backend that answers every request with `status`, recording request
/// lines. Each connection carries one request.
pub struct Backend {
    pub url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Backend {
    pub fn start(status: u16) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&requests);
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                if let Some(request_line) = read_request(&mut stream) {
                    log.lock().unwrap().push(request_line);
                }
                let response = format!(
                    "HTTP/1.1 {} X\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                    status
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        Backend { url, requests }
    }

    /// Request lines other than health probes, e.g. `POST /items HTTP/1.1`.
    pub fn replays(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|line| !line.contains("/api/health"))
            .cloned()
            .collect()
    }
}

/// Read one HTTP request (headers and body) and return its request line.
fn read_request(stream: &mut std::net::TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    head.lines().next().map(String::from)
}
