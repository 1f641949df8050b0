// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use outbox_core::Outbox;

use crate::error::Result;

use super::open;

pub async fn run(state_dir: &Path) -> Result<()> {
    let ctx = open(state_dir, false).await?;
    let cleared = run_impl(&ctx.outbox)?;
    println!("cleared {} queued action{}", cleared, if cleared == 1 { "" } else { "s" });
    Ok(())
}

/// Returns how many actions were dropped.
pub(crate) fn run_impl(outbox: &Outbox) -> Result<usize> {
    let before = outbox.pending_actions()?.len();
    outbox.clear()?;
    Ok(before)
}

#[cfg(test)]
#[path = "clear_tests.rs"]
mod tests;
