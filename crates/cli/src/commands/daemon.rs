// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon management commands.
//!
//! Commands that talk to a running wgsyncd through its state directory.

use std::io::Write;
use std::path::Path;

use serde_json::json;

use crate::cli::OutputFormat;
use crate::colors;
use crate::daemon::{self, DaemonClient, DaemonStatus};
use crate::error::{Error, Result};

/// Show daemon status.
///
/// A daemon that is alive but blocked in a connect or sync cycle is shown
/// as busy rather than as an error.
pub fn status<W: Write>(daemon_dir: &Path, output: OutputFormat, out: &mut W) -> Result<()> {
    let (status, busy) = match daemon::detect_daemon(daemon_dir) {
        Ok(Some(_)) => (
            Some(DaemonClient::connect(&daemon::get_socket_path(daemon_dir))?.status()?),
            None,
        ),
        Ok(None) => (None, None),
        Err(Error::DaemonBusy { pid }) => (None, Some(pid)),
        Err(e) => return Err(e),
    };

    match output {
        OutputFormat::Json => {
            let report = match (&status, busy) {
                (Some(status), _) => json!({ "running": true, "daemon": status }),
                (None, Some(pid)) => json!({ "running": true, "busy": true, "pid": pid }),
                (None, None) => json!({ "running": false }),
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        }
        OutputFormat::Text => match (&status, busy) {
            (Some(status), _) => write_status(status, out)?,
            (None, Some(pid)) => {
                writeln!(out, "Status: busy")?;
                writeln!(out, "PID: {}", pid)?;
            }
            (None, None) => writeln!(out, "Status: not running")?,
        },
    }
    Ok(())
}

fn write_status<W: Write>(status: &DaemonStatus, out: &mut W) -> Result<()> {
    writeln!(out, "Status: running")?;
    writeln!(out, "PID: {}", status.pid)?;
    writeln!(out, "Uptime: {}s", status.uptime_secs)?;
    if let Some(reason) = &status.not_ready_reason {
        writeln!(out, "Ready: no ({})", reason)?;
        return Ok(());
    }
    writeln!(out, "Tunnel: {}", colors::state(status.state))?;
    writeln!(out, "Display: {}", status.label)?;
    match status.last_sync {
        Some(at) => writeln!(out, "Last sync: {}", at.format("%Y-%m-%d %H:%M:%S UTC"))?,
        None => writeln!(out, "Last sync: {}", colors::context("never"))?,
    }
    Ok(())
}

/// Ask the daemon to sync now, regardless of the interval.
pub fn sync<W: Write>(daemon_dir: &Path, out: &mut W) -> Result<()> {
    daemon::detect_daemon(daemon_dir)?.ok_or(Error::DaemonNotRunning)?;
    let summary = DaemonClient::connect(&daemon::get_socket_path(daemon_dir))?.sync_now()?;
    if !summary.succeeded {
        return Err(Error::SyncFailed(
            summary.error.unwrap_or_else(|| "unknown error".to_string()),
        ));
    }
    writeln!(out, "Synced: {} files created", summary.files_created)?;
    Ok(())
}

/// Stop the daemon.
pub fn stop<W: Write>(daemon_dir: &Path, out: &mut W) -> Result<()> {
    match daemon::stop_daemon(daemon_dir) {
        Ok(info) => writeln!(out, "Daemon stopped (PID: {})", info.pid)?,
        Err(Error::DaemonNotRunning) => writeln!(out, "Daemon is not running.")?,
        Err(e) => return Err(e),
    }
    Ok(())
}

#[cfg(test)]
#[path = "daemon_tests.rs"]
mod tests;
