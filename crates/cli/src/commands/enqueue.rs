// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use outbox_core::{Outbox, QueuedActionInput};

use crate::cli::ActionArgs;
use crate::error::{Error, Result};

use super::{action_input, open};

pub async fn run(state_dir: &Path, args: &ActionArgs) -> Result<()> {
    // Reject bad input before touching the store
    let input = action_input(args)?;
    let ctx = open(state_dir, false).await?;
    let id = run_impl(&ctx.outbox, &input)?;
    println!("queued #{}", id);
    Ok(())
}

pub(crate) fn run_impl(outbox: &Outbox, input: &QueuedActionInput) -> Result<i64> {
    outbox.enqueue_action(input).ok_or(Error::NotQueued)
}

#[cfg(test)]
#[path = "enqueue_tests.rs"]
mod tests;
