// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `wgsync once`: run a single connectivity event in the foreground.

use std::io::Write;
use std::path::Path;

use wgs_core::sync::BackupOutcome;
use wgs_core::{Agent, Backends, ClockSource, ConnectionState, LogReporter, SyncReport, SystemClock};

use crate::colors;
use crate::error::{Error, Result};

pub fn run(config_path: &Path) -> Result<()> {
    let agent = Agent::load(config_path, Backends::system(), Box::new(LogReporter));
    run_impl(agent, &SystemClock, &mut std::io::stdout())
}

/// Connects if needed, syncs if due, and leaves the tunnel as it is.
pub(crate) fn run_impl<W: Write>(
    mut agent: Agent,
    clock: &dyn ClockSource,
    out: &mut W,
) -> Result<()> {
    if let Some(reason) = agent.not_ready_reason() {
        return Err(Error::NotReady(reason.to_string()));
    }
    let report = agent.on_connectivity(clock.now_secs());
    for line in describe(agent.state(), report.as_ref()) {
        writeln!(out, "{}", line)?;
    }
    match report {
        Some(report) if !report.succeeded() => Err(Error::SyncFailed(failure_detail(&report))),
        _ => Ok(()),
    }
}

/// Human readable lines for one connectivity event.
pub(crate) fn describe(state: ConnectionState, report: Option<&SyncReport>) -> Vec<String> {
    let mut lines = vec![format!("tunnel: {}", colors::state(state))];
    let Some(report) = report else {
        if state == ConnectionState::Up {
            lines.push(format!("sync:   {}", colors::context("not due")));
        }
        return lines;
    };

    match &report.artifacts {
        Some(artifacts) if artifacts.succeeded => {
            lines.push(format!("sync:   {} files created", artifacts.files_created))
        }
        _ => lines.push(format!("sync:   failed ({})", failure_detail(report))),
    }
    match &report.backup {
        BackupOutcome::Disabled => {}
        BackupOutcome::Skipped => lines.push("backup: skipped (archive missing)".to_string()),
        BackupOutcome::Attempted(outcome) if outcome.succeeded => {
            lines.push("backup: synced".to_string())
        }
        BackupOutcome::Attempted(outcome) => lines.push(format!(
            "backup: failed ({})",
            outcome.error_detail.as_deref().unwrap_or("unknown error")
        )),
    }
    lines
}

fn failure_detail(report: &SyncReport) -> String {
    report
        .provision_error
        .clone()
        .or_else(|| report.artifacts.as_ref().and_then(|a| a.error_detail.clone()))
        .unwrap_or_else(|| "unknown error".to_string())
}

#[cfg(test)]
#[path = "once_tests.rs"]
mod tests;
