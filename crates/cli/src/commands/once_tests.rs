// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use std::path::Path;
use std::time::Duration;

use wgs_core::backend::{BackendError, FileTransfer, RemoteHost, RemoteShell, TunnelBackend};
use wgs_core::sync::TransferOutcome;
use wgs_core::Sleeper;

use super::*;
use crate::commands::test_support::{capture, ConfigFixture};

struct Fixed(u64);

impl ClockSource for Fixed {
    fn now_secs(&self) -> u64 {
        self.0
    }
}

/// Tunnel and shell always succeed; the transfer replies with `reply`.
#[derive(Clone)]
struct Remote {
    reply: std::result::Result<String, String>,
}

impl TunnelBackend for Remote {
    fn bring_down(&mut self, _descriptor: &Path) -> std::result::Result<(), BackendError> {
        Ok(())
    }

    fn bring_up(&mut self, _descriptor: &Path) -> std::result::Result<(), BackendError> {
        Ok(())
    }
}

impl RemoteShell for Remote {
    fn run(&mut self, _host: &RemoteHost, _command: &str) -> std::result::Result<(), BackendError> {
        Ok(())
    }
}

impl FileTransfer for Remote {
    fn transfer(
        &mut self,
        _source: &Path,
        _host: &RemoteHost,
        _destination: &str,
    ) -> std::result::Result<String, BackendError> {
        self.reply.clone().map_err(|stderr| BackendError::Failed {
            program: "rsync".to_string(),
            status: "exit status: 12".to_string(),
            stderr,
        })
    }
}

impl Sleeper for Remote {
    fn sleep(&self, _duration: Duration) {}
}

fn agent(fixture: &ConfigFixture, reply: std::result::Result<&str, &str>) -> Agent {
    let remote = Remote { reply: reply.map(String::from).map_err(String::from) };
    let backends = Backends {
        tunnel: Box::new(remote.clone()),
        shell: Box::new(remote.clone()),
        transfer: Box::new(remote.clone()),
        sleeper: Box::new(remote),
    };
    let table = wgs_core::config::load_table(&fixture.path).unwrap();
    Agent::new(wgs_core::Settings::from_table(&table), backends, Box::new(LogReporter))
}

#[test]
fn connects_and_syncs() {
    let fixture = ConfigFixture::new("");
    let agent = agent(&fixture, Ok("Number of created files: 7\n"));

    let text = capture(|out| run_impl(agent, &Fixed(1_000), out).unwrap());

    assert!(text.lines().next().unwrap().contains("Up"));
    assert!(text.contains("sync:   7 files created"));
    assert!(fixture.descriptor().exists());
}

#[test]
fn failed_transfer_is_an_error() {
    let fixture = ConfigFixture::new("");
    let agent = agent(&fixture, Err("connection reset"));
    let mut out = Vec::new();

    let err = run_impl(agent, &Fixed(1_000), &mut out).unwrap_err();

    assert!(matches!(err, Error::SyncFailed(_)));
    assert!(err.to_string().contains("connection reset"));
    assert!(String::from_utf8(out).unwrap().contains("sync:   failed"));
}

#[test]
fn not_ready_agent_is_refused() {
    let backends = Backends::system();
    let agent = Agent::new(
        Err(wgs_core::Error::MissingKeys(vec!["private_key".to_string()])),
        backends,
        Box::new(LogReporter),
    );

    let err = run_impl(agent, &Fixed(1_000), &mut Vec::new()).unwrap_err();

    assert!(matches!(err, Error::NotReady(_)));
    assert!(err.to_string().contains("missing required config options: private_key"));
}

#[test]
fn describe_not_due() {
    let lines = describe(ConnectionState::Up, None);
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains("not due"));
}

#[test]
fn describe_failed_tunnel_has_no_sync_line() {
    let lines = describe(ConnectionState::Failed, None);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("Failed"));
}

#[test]
fn describe_backup_outcomes() {
    let mut report = SyncReport {
        provision_error: None,
        artifacts: Some(TransferOutcome::completed(2)),
        backup: BackupOutcome::Skipped,
    };
    let lines = describe(ConnectionState::Up, Some(&report));
    assert_eq!(lines[2], "backup: skipped (archive missing)");

    report.backup = BackupOutcome::Attempted(TransferOutcome::failed("disk full"));
    let lines = describe(ConnectionState::Up, Some(&report));
    assert_eq!(lines[1], "sync:   2 files created");
    assert_eq!(lines[2], "backup: failed (disk full)");
}

#[test]
fn describe_provision_failure() {
    let report = SyncReport {
        provision_error: Some("permission denied".to_string()),
        artifacts: None,
        backup: BackupOutcome::Disabled,
    };
    let lines = describe(ConnectionState::Up, Some(&report));
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], "sync:   failed (permission denied)");
}

#[test]
fn describe_backup_after_failed_artifacts() {
    let report = SyncReport {
        provision_error: None,
        artifacts: Some(TransferOutcome::failed("partial transfer")),
        backup: BackupOutcome::Attempted(TransferOutcome::completed(1)),
    };
    let lines = describe(ConnectionState::Up, Some(&report));
    assert_eq!(lines[1], "sync:   failed (partial transfer)");
    assert_eq!(lines[2], "backup: synced");
}
