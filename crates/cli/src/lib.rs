// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! wgsync - operator CLI for the wgsyncd tunnel and handshake sync agent.
//!
//! The foreground commands (`check`, `render`, `once`, `down`) read the
//! config file directly. The daemon commands (`status`, `sync`, `stop`) talk
//! to a running wgsyncd over its Unix socket.

mod cli;
pub mod colors;
mod commands;
mod daemon;
mod env;

pub mod error;

pub use cli::{Cli, Command, OutputFormat};
pub use error::{Error, Result};

use tracing_subscriber::EnvFilter;

/// Installs a stderr logger. `RUST_LOG` overrides the level chosen by `--verbose`.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run(cli: Cli) -> Result<()> {
    let config_path = env::resolve_config(cli.config);
    let state_dir = env::resolve_state_dir(cli.state_dir);
    let mut stdout = std::io::stdout();

    match cli.command {
        Command::Check { output } => commands::check::run(&config_path, output),
        Command::Render => commands::render::run(&config_path),
        Command::Once => commands::once::run(&config_path),
        Command::Down => commands::down::run(&config_path),
        Command::Status { output } => commands::daemon::status(&state_dir, output, &mut stdout),
        Command::Sync => commands::daemon::sync(&state_dir, &mut stdout),
        Command::Stop => commands::daemon::stop(&state_dir, &mut stdout),
    }
}
