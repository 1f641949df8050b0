// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use outbox_core::{Outbox, QueuedActionInput, SubmitOutcome};

use crate::cli::ActionArgs;
use crate::error::{Error, Result};

use super::{action_input, open};

pub async fn run(state_dir: &Path, args: &ActionArgs) -> Result<()> {
    let input = action_input(args)?;
    let ctx = open(state_dir, true).await?;
    println!("{}", run_impl(&ctx.outbox, input).await?);
    Ok(())
}

pub(crate) async fn run_impl(outbox: &Outbox, input: QueuedActionInput) -> Result<String> {
    let outcome = outbox
        .submit(input.kind, input.endpoint, input.method, input.payload)
        .await;
    match outcome {
        SubmitOutcome::Sent => Ok("sent".to_string()),
        SubmitOutcome::Queued { id } => Ok(format!("queued #{}", id)),
        SubmitOutcome::Lost => Err(Error::NotQueued),
    }
}

#[cfg(test)]
#[path = "submit_tests.rs"]
mod tests;
