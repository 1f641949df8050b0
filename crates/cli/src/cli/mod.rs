// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use outbox_core::Method;

/// Parse an HTTP method, case-insensitively.
fn parse_method(s: &str) -> Result<Method, String> {
    s.parse::<Method>()
        .map_err(|_| format!("'{}' is not one of GET, POST, PUT, PATCH, DELETE", s))
}

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "outbox")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline action queue: defer mutating API calls and replay them when online")]
#[command(
    long_about = "Offline action queue.\n\n\
    Mutating requests that cannot reach the backend are stored in a local queue \
    and replayed in order once connectivity returns."
)]
pub struct Cli {
    /// Log progress to stderr (RUST_LOG overrides)
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// A request to send or defer.
#[derive(Args, Debug, Clone)]
pub struct ActionArgs {
    /// HTTP method (GET, POST, PUT, PATCH, DELETE)
    #[arg(value_parser = parse_method)]
    pub method: Method,

    /// Endpoint path relative to the base URL, e.g. /items
    #[arg(value_parser = non_empty_string)]
    pub endpoint: String,

    /// Action kind label [default: <method>_<first path segment>]
    #[arg(long, short = 'k', value_parser = non_empty_string)]
    pub kind: Option<String>,

    /// JSON request body
    #[arg(long, short = 'd')]
    pub data: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Queue a request for later replay
    #[command(after_help = "\
Examples:
  outbox enqueue POST /items -d '{\"content\": \"buy milk\"}'
  outbox enqueue put /contacts/3 --kind update_contact -d '{\"name\": \"Ada\"}'
  outbox enqueue DELETE /bookmarks/9")]
    Enqueue(ActionArgs),

    /// Send a request now, or queue it if the backend is unreachable
    Submit(ActionArgs),

    /// Show queued actions in replay order
    List {
        #[arg(long = "output", short = 'o', value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Show connectivity and queue status
    Status {
        #[arg(long = "output", short = 'o', value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Probe the backend and replay the queue once (skipped while `watch` runs)
    Sync {
        #[arg(long = "output", short = 'o', value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Drop every queued action
    Clear,

    /// Keep draining the queue in the foreground until Ctrl-C
    Watch,

    /// Generate shell completions
    #[command(after_help = "\
Examples:
  outbox completion bash > ~/.local/share/bash-completion/completions/outbox
  outbox completion zsh > ~/.zfunc/_outbox
  outbox completion fish > ~/.config/fish/completions/outbox.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
