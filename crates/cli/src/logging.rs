// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins when set. Otherwise one-shot commands log warnings and
//! `--verbose` raises that to `info`.

use std::fs;
use std::path::Path;

use tracing_subscriber::EnvFilter;

pub(crate) fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "info"
    } else {
        "warn"
    }
}

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Log to stderr.
pub fn init_stderr(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Log to `log_path`, falling back to stderr if it cannot be opened.
pub fn init_file(log_path: &Path, verbose: bool) {
    let file = log_path
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|()| {
            fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)
        });

    match file {
        Ok(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter(verbose))
                .with_writer(file)
                .with_ansi(false)
                .try_init();
        }
        Err(_) => init_stderr(verbose),
    }
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
