// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use outbox_core::QueueStatus;

use crate::cli::OutputFormat;
use crate::error::Result;

use super::open;

pub async fn run(state_dir: &Path, output: OutputFormat) -> Result<()> {
    let ctx = open(state_dir, true).await?;
    println!("{}", render(&ctx.outbox.status(), output)?);
    Ok(())
}

pub(crate) fn render(status: &QueueStatus, output: OutputFormat) -> Result<String> {
    match output {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(status)?),
        OutputFormat::Text => Ok(format!(
            "online: {}\npending: {}\nsyncing: {}",
            yes_no(status.is_online),
            status.pending_count,
            yes_no(status.is_syncing)
        )),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
