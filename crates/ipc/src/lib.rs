// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared IPC protocol for CLI-daemon communication.
//!
//! This crate defines the message types and framing protocol used between
//! the `wgsync` CLI and the `wgsyncd` daemon. Messages are serialized as
//! JSON with length-prefixed framing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use wgs_core::ConnectionState;
use wgs_core::sync::{BackupOutcome, SyncReport};

/// Request sent from CLI to daemon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum DaemonRequest {
    /// Get daemon status.
    Status,
    /// Tear down the tunnel and exit.
    Shutdown,
    /// Ping to check if daemon is alive.
    Ping,
    /// Version handshake request.
    Hello { version: String },
    /// Run a sync cycle now, ignoring the cooldown.
    SyncNow,
}

/// Response sent from daemon to CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum DaemonResponse {
    /// Status response.
    Status(DaemonStatus),
    /// Shutdown acknowledged.
    ShuttingDown,
    /// Pong response.
    Pong,
    /// Error response.
    Error { message: String },
    /// Version handshake response.
    Hello { version: String },
    /// A forced sync cycle ran.
    Synced(SyncSummary),
}

/// Daemon status information.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DaemonStatus {
    /// Current daemon PID.
    pub pid: u32,
    /// Uptime in seconds.
    pub uptime_secs: u64,
    /// Whether configuration validated at startup.
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_ready_reason: Option<String>,
    pub state: ConnectionState,
    /// Status label currently displayed.
    pub label: String,
    /// When the last sync cycle ran, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<DateTime<Utc>>,
}

impl DaemonStatus {
    /// Create a status for a ready daemon that has not synced yet.
    pub fn new(pid: u32, uptime_secs: u64) -> Self {
        Self {
            pid,
            uptime_secs,
            ready: true,
            not_ready_reason: None,
            state: ConnectionState::Starting,
            label: ConnectionState::Starting.label().to_string(),
            last_sync: None,
        }
    }
}

/// What happened to the backup archive during a sync cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupStatus {
    Disabled,
    Skipped,
    Synced,
    Failed,
}

/// Summary of one sync cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncSummary {
    pub succeeded: bool,
    pub files_created: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub backup: BackupStatus,
}

impl From<&SyncReport> for SyncSummary {
    fn from(report: &SyncReport) -> Self {
        let error = report.provision_error.clone().or_else(|| {
            report.artifacts.as_ref().and_then(|a| a.error_detail.clone())
        });
        let backup = match &report.backup {
            BackupOutcome::Disabled => BackupStatus::Disabled,
            BackupOutcome::Skipped => BackupStatus::Skipped,
            BackupOutcome::Attempted(outcome) if outcome.succeeded => BackupStatus::Synced,
            BackupOutcome::Attempted(_) => BackupStatus::Failed,
        };
        SyncSummary {
            succeeded: report.succeeded(),
            files_created: report.files_created(),
            error,
            backup,
        }
    }
}

/// Converts unix seconds to a UTC timestamp.
pub fn timestamp(unix_secs: u64) -> Option<DateTime<Utc>> {
    i64::try_from(unix_secs).ok().and_then(|secs| DateTime::from_timestamp(secs, 0))
}

// ============================================================================
// Message framing
// ============================================================================

/// IPC message framing.
///
/// Messages are framed as:
/// - 4 bytes: message length (big-endian u32)
/// - N bytes: JSON-encoded message
pub mod framing {
    use std::io::{Read, Write};

    use serde::de::DeserializeOwned;
    use serde::Serialize;

    /// Maximum message size (64KB); status messages are small.
    const MAX_MESSAGE_SIZE: usize = 64 * 1024;

    /// Write a serializable message to the given writer.
    pub fn write_message<W: Write, T: Serialize>(
        writer: &mut W,
        message: &T,
    ) -> std::io::Result<()> {
        let json = serde_json::to_vec(message)
            .map_err(|e| std::io::Error::other(format!("serialize error: {}", e)))?;
        let len =
            u32::try_from(json.len()).map_err(|_| std::io::Error::other("message too large"))?;
        writer.write_all(&len.to_be_bytes())?;
        writer.write_all(&json)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a deserializable message from the given reader.
    pub fn read_message<R: Read, T: DeserializeOwned>(reader: &mut R) -> std::io::Result<T> {
        let mut len_buf = [0u8; 4];
        reader.read_exact(&mut len_buf)?;
        let len = u32::from_be_bytes(len_buf) as usize;

        if len > MAX_MESSAGE_SIZE {
            return Err(std::io::Error::other(format!(
                "message too large: {} bytes (max {})",
                len, MAX_MESSAGE_SIZE
            )));
        }

        let mut buf = vec![0u8; len];
        reader.read_exact(&mut buf)?;

        serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::other(format!("deserialize error: {}", e)))
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
