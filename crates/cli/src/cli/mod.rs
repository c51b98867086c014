// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::colors;

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "wgsync")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Keep a WireGuard tunnel up and push captured handshakes to the server")]
#[command(styles = colors::styles())]
pub struct Cli {
    /// Config file [default: $WGSYNC_CONFIG or /etc/wgsync/config.toml]
    #[arg(short, long, global = true, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Daemon state directory [default: $WGSYNC_STATE_DIR or ~/.local/state/wgsync]
    #[arg(long, global = true, value_name = "path")]
    pub state_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Validate the config and required programs
    Check {
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Print the tunnel descriptor with keys redacted
    Render,

    /// Connect and sync once in the foreground
    Once,

    /// Tear down the tunnel
    Down,

    /// Show daemon status
    Status {
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Ask the daemon to sync now, ignoring the interval
    Sync,

    /// Stop the daemon (tears down the tunnel)
    Stop,
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
