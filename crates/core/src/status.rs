// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Status reporting.
//!
//! Components publish a short label (`Up`, `DNS Retry`, `Synced: 3`, ...)
//! through [`StatusBoard`], which forwards it to a [`StatusReporter`].
//! Display is best-effort: reporters never fail.

use std::fs;
use std::path::PathBuf;

/// Well-known status labels.
pub mod labels {
    pub const STARTING: &str = "Starting";
    pub const CONNECTING: &str = "Connecting";
    pub const DNS_RETRY: &str = "DNS Retry";
    pub const UP: &str = "Up";
    pub const ERROR: &str = "Error";
    pub const FAILED: &str = "Failed";
    pub const BACKEND_MISSING: &str = "No wg-quick";
    pub const SYNCING: &str = "Syncing...";
    pub const SYNC_FAILED: &str = "Sync Failed";
    pub const DOWN: &str = "Down";

    /// Label shown after a successful sync.
    pub fn synced(files_created: u64) -> String {
        format!("Synced: {}", files_created)
    }
}

/// A display surface for the current status label.
pub trait StatusReporter {
    /// Updates the display synchronously.
    fn set(&mut self, label: &str);
}

/// Reporter that only emits a log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl StatusReporter for LogReporter {
    fn set(&mut self, label: &str) {
        tracing::info!(status = label, "status changed");
    }
}

/// Reporter that mirrors the label into a small file for external displays.
///
/// The file is replaced atomically so readers never see a partial label.
#[derive(Debug, Clone)]
pub struct FileReporter {
    path: PathBuf,
}

impl FileReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileReporter { path: path.into() }
    }
}

impl StatusReporter for FileReporter {
    fn set(&mut self, label: &str) {
        tracing::info!(status = label, "status changed");
        let tmp = self.path.with_extension("tmp");
        let result = fs::write(&tmp, format!("{}\n", label)).and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(e) = result {
            tracing::debug!("failed to write status file {}: {}", self.path.display(), e);
        }
    }
}

/// A label restore scheduled by [`StatusBoard::hold`].
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingRestore {
    due: u64,
    generation: u64,
    label: String,
}

/// Tracks the current label and schedules reverts of temporary labels.
///
/// Labels set with [`set`](Self::set) are persistent and become the resting
/// label. [`show`](Self::show) and [`hold`](Self::hold) display a label
/// without changing the resting one; `hold` also schedules a return to the
/// resting label, applied by [`tick`](Self::tick) once due. Every publish
/// bumps a generation counter, and a scheduled restore only applies if no
/// other label was published since it was scheduled.
pub struct StatusBoard {
    reporter: Box<dyn StatusReporter>,
    current: String,
    resting: String,
    generation: u64,
    pending: Option<PendingRestore>,
}

impl StatusBoard {
    /// Creates a board and publishes the initial `Starting` label.
    pub fn new(reporter: Box<dyn StatusReporter>) -> Self {
        let mut board = StatusBoard {
            reporter,
            current: String::new(),
            resting: labels::STARTING.to_string(),
            generation: 0,
            pending: None,
        };
        board.publish(labels::STARTING);
        board
    }

    /// The label currently displayed.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// The label temporary labels revert to.
    pub fn resting(&self) -> &str {
        &self.resting
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns true while a temporary label is waiting to be reverted.
    pub fn has_pending_restore(&self) -> bool {
        self.pending.is_some()
    }

    /// Publishes a persistent label.
    pub fn set(&mut self, label: &str) {
        self.resting = label.to_string();
        self.publish(label);
    }

    /// Publishes a transient label without changing the resting label.
    pub fn show(&mut self, label: &str) {
        self.publish(label);
    }

    /// Shows `label` now and reverts to the resting label `hold_secs` after `now`.
    pub fn hold(&mut self, label: &str, now: u64, hold_secs: u64) {
        self.publish(label);
        self.pending = Some(PendingRestore {
            due: now.saturating_add(hold_secs),
            generation: self.generation,
            label: self.resting.clone(),
        });
    }

    /// Applies a due restore. Stale restores are dropped.
    pub fn tick(&mut self, now: u64) {
        let due = self.pending.as_ref().is_some_and(|p| now >= p.due);
        if !due {
            return;
        }
        if let Some(restore) = self.pending.take() {
            if restore.generation == self.generation {
                self.publish(&restore.label);
            }
        }
    }

    fn publish(&mut self, label: &str) {
        self.generation = self.generation.wrapping_add(1);
        self.current = label.to_string();
        self.reporter.set(label);
    }
}

impl std::fmt::Debug for StatusBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusBoard")
            .field("current", &self.current)
            .field("resting", &self.resting)
            .field("generation", &self.generation)
            .field("pending", &self.pending)
            .finish()
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
