// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! outboxrs - command-line host for the outbox offline action queue.
//!
//! Wires [`outbox_core`] to a SQLite queue in the state directory, an HTTP
//! backend described by `config.toml`, and a connectivity probe.
//!
//! # Main Components
//!
//! - [`Cli`] / [`Command`] - argument parsing
//! - [`Config`] - backend location and timings
//! - [`run`] - command dispatch
//! - [`Error`] - error types for all operations

mod cli;
mod commands;
mod logging;

pub mod config;
pub mod env;
pub mod error;

pub use cli::{ActionArgs, Cli, Command, OutputFormat};
pub use config::Config;
pub use error::{Error, Result};

/// Execute a parsed command line. This is the main entry point for library
/// users and provides a testable way to run commands without process execution.
pub fn run(cli: Cli) -> Result<()> {
    let state_dir = config::state_dir();

    match &cli.command {
        Command::Watch => logging::init_file(&config::log_path(&state_dir), cli.verbose),
        _ => logging::init_stderr(cli.verbose),
    }

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Io(std::io::Error::other(format!("tokio: {}", e))))?;

    rt.block_on(async {
        match cli.command {
            Command::Enqueue(args) => commands::enqueue::run(&state_dir, &args).await,
            Command::Submit(args) => commands::submit::run(&state_dir, &args).await,
            Command::List { output } => commands::list::run(&state_dir, output).await,
            Command::Status { output } => commands::status::run(&state_dir, output).await,
            Command::Sync { output } => commands::sync::run(&state_dir, output).await,
            Command::Clear => commands::clear::run(&state_dir).await,
            Command::Watch => commands::watch::run(&state_dir).await,
            Command::Completion { shell } => {
                commands::completion::run(shell);
                Ok(())
            }
        }
    })
}
