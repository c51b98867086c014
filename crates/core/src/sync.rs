// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync scheduling and transfer.
//!
//! Once the tunnel is up, a sync cycle runs at most once per interval:
//! provision the remote directories, push the artifact directory, then
//! optionally push the device's backup archive. The cooldown advances after
//! every attempted cycle, failed or not, so a broken remote is retried once
//! per interval rather than in a tight loop.

use std::path::{Path, PathBuf};

use crate::backend::FileTransfer;
use crate::provision::RemoteProvisioner;
use crate::status::{labels, StatusBoard};
use crate::tunnel::ConnectionState;

/// Directory under the device directory that receives artifacts.
pub const ARTIFACT_DIR_NAME: &str = "handshakes";

/// Marker of the rsync stats line counting newly created files.
const CREATED_FILES_MARKER: &str = "Number of created files:";

/// Where artifacts land on the remote host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTarget {
    pub remote_user: String,
    /// Base directory holding one directory per device. `None` for the
    /// legacy flat layout.
    pub remote_base_dir: Option<String>,
    pub device_identifier: String,
    /// `<base>/<device>`; the flat directory in the legacy layout.
    pub remote_device_dir: String,
    /// `<base>/<device>/handshakes`; the flat directory in the legacy layout.
    pub remote_artifact_dir: String,
}

impl SyncTarget {
    /// Per-device layout under `base`.
    pub fn per_device(remote_user: String, base: &str, device_identifier: String) -> Self {
        let remote_device_dir = join_remote(base, &device_identifier);
        let remote_artifact_dir = join_remote(&remote_device_dir, ARTIFACT_DIR_NAME);
        SyncTarget {
            remote_user,
            remote_base_dir: Some(base.to_string()),
            device_identifier,
            remote_device_dir,
            remote_artifact_dir,
        }
    }

    /// Legacy layout: everything goes into one flat directory.
    pub fn legacy(remote_user: String, flat_dir: &str, device_identifier: String) -> Self {
        SyncTarget {
            remote_user,
            remote_base_dir: None,
            device_identifier,
            remote_device_dir: flat_dir.to_string(),
            remote_artifact_dir: flat_dir.to_string(),
        }
    }
}

fn join_remote(base: &str, segment: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), segment)
}

/// Last-sync bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncRecord {
    /// Unix seconds of the last attempted cycle; 0 if none yet.
    pub last_sync_timestamp: u64,
    pub sync_interval_secs: u64,
}

impl SyncRecord {
    pub fn new(sync_interval_secs: u64) -> Self {
        SyncRecord { last_sync_timestamp: 0, sync_interval_secs }
    }

    /// Returns true once the interval has elapsed since the last cycle.
    pub fn is_due(&self, now: u64) -> bool {
        now.saturating_sub(self.last_sync_timestamp) >= self.sync_interval_secs
    }

    pub fn mark(&mut self, now: u64) {
        self.last_sync_timestamp = now;
    }
}

/// Result of one transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub files_created: u64,
    pub succeeded: bool,
    pub error_detail: Option<String>,
}

impl TransferOutcome {
    pub fn completed(files_created: u64) -> Self {
        TransferOutcome { files_created, succeeded: true, error_detail: None }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        TransferOutcome { files_created: 0, succeeded: false, error_detail: Some(detail.into()) }
    }
}

/// What happened to the backup archive during a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    /// Backup sync is not enabled.
    Disabled,
    /// Enabled, but the archive does not exist locally.
    Skipped,
    /// The archive was handed to the transfer backend.
    Attempted(TransferOutcome),
}

/// Summary of one sync cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Provisioning error, if the cycle stopped before any transfer.
    pub provision_error: Option<String>,
    /// Artifact transfer; `None` when provisioning failed.
    pub artifacts: Option<TransferOutcome>,
    pub backup: BackupOutcome,
}

impl SyncReport {
    /// A cycle succeeds when any transfer it attempted did. One failed
    /// transfer never fails a sibling that went through.
    pub fn succeeded(&self) -> bool {
        self.transfers().any(|t| t.succeeded)
    }

    /// New files across every transfer that succeeded.
    pub fn files_created(&self) -> u64 {
        self.transfers().filter(|t| t.succeeded).map(|t| t.files_created).sum()
    }

    fn transfers(&self) -> impl Iterator<Item = &TransferOutcome> {
        let backup = match &self.backup {
            BackupOutcome::Attempted(outcome) => Some(outcome),
            BackupOutcome::Disabled | BackupOutcome::Skipped => None,
        };
        self.artifacts.iter().chain(backup)
    }
}

/// Extracts the created-files count from rsync `--stats` output.
///
/// Reads the integer after `Number of created files:`, with thousands
/// separators removed. A missing or unreadable line counts as zero.
pub fn parse_created_files(stdout: &str) -> u64 {
    let Some(line) = stdout.lines().find(|line| line.contains(CREATED_FILES_MARKER)) else {
        return 0;
    };
    let count = line
        .split_once(':')
        .and_then(|(_, rest)| rest.split_whitespace().next())
        .map(|token| token.replace(',', ""))
        .and_then(|digits| digits.parse::<u64>().ok());

    count.unwrap_or_else(|| {
        tracing::debug!("unreadable stats line: {}", line.trim());
        0
    })
}

/// Decides when to sync and drives the transfers.
pub struct SyncOrchestrator {
    target: SyncTarget,
    source_dir: PathBuf,
    backup_archive: Option<PathBuf>,
    hold_secs: u64,
    provisioner: RemoteProvisioner,
    transfer: Box<dyn FileTransfer>,
}

impl SyncOrchestrator {
    pub fn new(
        target: SyncTarget,
        source_dir: PathBuf,
        provisioner: RemoteProvisioner,
        transfer: Box<dyn FileTransfer>,
    ) -> Self {
        SyncOrchestrator {
            target,
            source_dir,
            backup_archive: None,
            hold_secs: 15,
            provisioner,
            transfer,
        }
    }

    /// Enables pushing `archive` to the device directory each cycle.
    pub fn with_backup(mut self, archive: Option<PathBuf>) -> Self {
        self.backup_archive = archive;
        self
    }

    /// How long result labels stay displayed.
    pub fn with_hold_secs(mut self, hold_secs: u64) -> Self {
        self.hold_secs = hold_secs;
        self
    }

    pub fn target(&self) -> &SyncTarget {
        &self.target
    }

    /// Runs a cycle if the tunnel is up and the interval has elapsed.
    ///
    /// The record advances to `now` after every cycle that ran, whatever
    /// its outcome.
    pub fn maybe_sync(
        &mut self,
        now: u64,
        connection: ConnectionState,
        record: &mut SyncRecord,
        status: &mut StatusBoard,
    ) -> Option<SyncReport> {
        if connection != ConnectionState::Up {
            return None;
        }
        if !record.is_due(now) {
            tracing::debug!(
                "sync not due ({}s since last, interval {}s)",
                now.saturating_sub(record.last_sync_timestamp),
                record.sync_interval_secs
            );
            return None;
        }
        let report = self.run_cycle(now, status);
        record.mark(now);
        Some(report)
    }

    /// Runs one sync cycle unconditionally.
    pub fn run_cycle(&mut self, now: u64, status: &mut StatusBoard) -> SyncReport {
        tracing::info!("starting handshake sync");
        status.show(labels::SYNCING);

        if let Err(e) = self.provisioner.ensure_dir(&self.target.remote_artifact_dir) {
            tracing::error!("{}", e);
            status.hold(labels::SYNC_FAILED, now, self.hold_secs);
            return SyncReport {
                provision_error: Some(e.to_string()),
                artifacts: None,
                backup: BackupOutcome::Disabled,
            };
        }

        let source = self.source_dir.clone();
        let destination = self.target.remote_artifact_dir.clone();
        let artifacts = self.push(&source, &destination);
        if artifacts.succeeded {
            tracing::info!("sync complete, transferred {} new files", artifacts.files_created);
        } else {
            tracing::error!(
                "handshake sync failed: {}",
                artifacts.error_detail.as_deref().unwrap_or("unknown error")
            );
        }

        let backup = self.push_backup();
        let report = SyncReport { provision_error: None, artifacts: Some(artifacts), backup };

        if report.succeeded() {
            status.hold(&labels::synced(report.files_created()), now, self.hold_secs);
        } else {
            status.hold(labels::SYNC_FAILED, now, self.hold_secs);
        }
        report
    }

    fn push_backup(&mut self) -> BackupOutcome {
        let Some(archive) = self.backup_archive.clone() else {
            return BackupOutcome::Disabled;
        };
        if !archive.exists() {
            tracing::warn!("backup archive {} not found, skipping", archive.display());
            return BackupOutcome::Skipped;
        }

        // Trailing slash: the destination is a directory and the archive
        // keeps its file name.
        let destination = format!("{}/", self.target.remote_device_dir.trim_end_matches('/'));
        let outcome = self.push(&archive, &destination);
        if outcome.succeeded {
            tracing::info!("backup {} synced", archive.display());
        } else {
            tracing::error!(
                "backup sync failed: {}",
                outcome.error_detail.as_deref().unwrap_or("unknown error")
            );
        }
        BackupOutcome::Attempted(outcome)
    }

    fn push(&mut self, source: &Path, destination: &str) -> TransferOutcome {
        match self.transfer.transfer(source, self.provisioner.host(), destination) {
            Ok(stdout) => TransferOutcome::completed(parse_created_files(&stdout)),
            Err(e) => TransferOutcome::failed(e.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
