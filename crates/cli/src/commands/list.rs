// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use outbox_core::{Outbox, QueuedAction};

use crate::cli::OutputFormat;
use crate::error::Result;

use super::open;

pub async fn run(state_dir: &Path, output: OutputFormat) -> Result<()> {
    let ctx = open(state_dir, false).await?;
    println!("{}", run_impl(&ctx.outbox, output)?);
    Ok(())
}

pub(crate) fn run_impl(outbox: &Outbox, output: OutputFormat) -> Result<String> {
    let actions = outbox.pending_actions()?;
    match output {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&actions)?),
        OutputFormat::Text => Ok(format_text(&actions)),
    }
}

fn format_text(actions: &[QueuedAction]) -> String {
    if actions.is_empty() {
        return "queue is empty".to_string();
    }
    actions
        .iter()
        .map(|a| {
            format!(
                "{}  {}",
                a.summary(),
                a.enqueued_at.format("%Y-%m-%d %H:%M:%S")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
