// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon detection and shutdown.
//!
//! PID and socket files live in the state directory (~/.local/state/wgsync/).

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

use super::client::DaemonClient;

/// Socket filename within daemon directory.
const SOCKET_NAME: &str = "daemon.sock";
/// PID filename within daemon directory.
const PID_NAME: &str = "daemon.pid";

/// How long to wait for a stopped daemon to exit.
const EXIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Information about a running daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonInfo {
    /// Process ID of the daemon.
    pub pid: u32,
}

/// Get the socket path for the given daemon directory.
pub fn get_socket_path(daemon_dir: &Path) -> PathBuf {
    daemon_dir.join(SOCKET_NAME)
}

/// Get the PID file path for the given daemon directory.
pub fn get_pid_path(daemon_dir: &Path) -> PathBuf {
    daemon_dir.join(PID_NAME)
}

/// Detect if a daemon is running for the given daemon directory.
///
/// Returns `Ok(Some(..))` if a daemon answers a ping and `Ok(None)` if none
/// is running, removing leftover socket and PID files. A daemon whose
/// process is alive but does not answer is left untouched.
///
/// # Errors
///
/// Returns [`Error::DaemonBusy`] when the PID is alive but the ping fails.
pub fn detect_daemon(daemon_dir: &Path) -> Result<Option<DaemonInfo>> {
    let socket_path = get_socket_path(daemon_dir);
    let pid_path = get_pid_path(daemon_dir);

    if !socket_path.exists() {
        if pid_path.exists() {
            let _ = fs::remove_file(&pid_path);
        }
        return Ok(None);
    }

    let mut client = match DaemonClient::connect(&socket_path) {
        Ok(client) => client,
        Err(Error::DaemonConnect(e))
            if matches!(e.kind(), ErrorKind::ConnectionRefused | ErrorKind::NotFound) =>
        {
            tracing::debug!("stale daemon socket: {}", e);
            cleanup_stale_files(daemon_dir);
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    let pid = read_pid_file(&pid_path).filter(|&pid| pid > 0);
    match client.ping() {
        Ok(()) => Ok(pid.map(|pid| DaemonInfo { pid })),
        Err(e) => match pid {
            Some(pid) if process_alive(pid) => {
                tracing::debug!("daemon (pid {}) not responding: {}", pid, e);
                Err(Error::DaemonBusy { pid })
            }
            _ => {
                tracing::debug!("daemon not responding and not alive: {}", e);
                cleanup_stale_files(daemon_dir);
                Ok(None)
            }
        },
    }
}

/// Ask the daemon to shut down and wait for it to exit.
///
/// # Errors
///
/// Returns [`Error::DaemonNotRunning`] if no daemon answers.
pub fn stop_daemon(daemon_dir: &Path) -> Result<DaemonInfo> {
    let info = detect_daemon(daemon_dir)?.ok_or(Error::DaemonNotRunning)?;

    DaemonClient::connect(&get_socket_path(daemon_dir))?.shutdown()?;

    if !wait_for_process_exit(info.pid, EXIT_TIMEOUT) {
        tracing::warn!("wgsyncd (pid {}) still running after {:?}", info.pid, EXIT_TIMEOUT);
    }
    Ok(info)
}

/// Clean up stale socket and PID files.
fn cleanup_stale_files(daemon_dir: &Path) {
    let _ = fs::remove_file(get_socket_path(daemon_dir));
    let _ = fs::remove_file(get_pid_path(daemon_dir));
}

/// Read PID from the PID file.
fn read_pid_file(pid_path: &Path) -> Option<u32> {
    fs::read_to_string(pid_path).ok().and_then(|s| s.trim().parse().ok())
}

/// Wait for a process to exit, with timeout. Returns true once it is gone.
fn wait_for_process_exit(pid: u32, timeout: Duration) -> bool {
    let start = Instant::now();

    while start.elapsed() < timeout {
        if !process_alive(pid) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    false
}

/// Whether a process with this PID exists, via `kill -0`.
fn process_alive(pid: u32) -> bool {
    Command::new("kill")
        .arg("-0")
        .arg(pid.to_string())
        .output()
        .is_ok_and(|output| output.status.success())
}
