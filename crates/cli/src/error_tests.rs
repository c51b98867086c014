// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    not_ready = {
        Error::NotReady("rsync is not installed".into()),
        "not ready: rsync is not installed\n  hint: run 'wgsync check' to see what is missing"
    },
    daemon_not_running = { Error::DaemonNotRunning, "wgsyncd is not running" },
    daemon_busy = {
        Error::DaemonBusy { pid: 42 },
        "wgsyncd (pid 42) did not answer\n  hint: it blocks while connecting or syncing, try again shortly"
    },
    daemon = { Error::Daemon("unexpected response".into()), "daemon error: unexpected response" },
    sync_failed = { Error::SyncFailed("transfer failed".into()), "sync failed: transfer failed" },
)]
fn error_display(error: Error, expected: &str) {
    assert_eq!(error.to_string(), expected);
}

#[test]
fn core_errors_display_transparently() {
    let error: Error = wgs_core::Error::MissingKeys(vec!["peer_endpoint".into()]).into();
    assert_eq!(error.to_string(), "missing required config options: peer_endpoint");
}

#[test]
fn io_error_converts() {
    let error: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(error, Error::Io(_)));
}
