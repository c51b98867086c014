// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors that can occur in the wgsync CLI.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] wgs_core::Error),

    #[error("not ready: {0}\n  hint: run 'wgsync check' to see what is missing")]
    NotReady(String),

    #[error("wgsyncd is not running")]
    DaemonNotRunning,

    #[error("wgsyncd (pid {pid}) did not answer\n  hint: it blocks while connecting or syncing, try again shortly")]
    DaemonBusy { pid: u32 },

    #[error("failed to connect to daemon: {0}")]
    DaemonConnect(#[source] std::io::Error),

    #[error("daemon error: {0}")]
    Daemon(String),

    #[error("sync failed: {0}")]
    SyncFailed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for wgsync CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
