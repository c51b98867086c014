// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Request handling for the daemon socket.

use std::io::{Read, Write};

use wgs_core::Agent;
pub use wgs_ipc::{framing, DaemonRequest, DaemonResponse, DaemonStatus, SyncSummary};

/// Answers one request against the agent.
///
/// `Shutdown` is only acknowledged here; the caller tears down the tunnel
/// once the response has been written.
pub fn handle_request(
    request: DaemonRequest,
    agent: &mut Agent,
    uptime_secs: u64,
    now: u64,
) -> DaemonResponse {
    match request {
        DaemonRequest::Ping => DaemonResponse::Pong,
        DaemonRequest::Status => DaemonResponse::Status(status(agent, uptime_secs)),
        DaemonRequest::Shutdown => DaemonResponse::ShuttingDown,
        DaemonRequest::Hello { version } => {
            if version != env!("CARGO_PKG_VERSION") {
                tracing::warn!("client version {} differs from daemon", version);
            }
            DaemonResponse::Hello { version: env!("CARGO_PKG_VERSION").to_string() }
        }
        DaemonRequest::SyncNow => match agent.sync_now(now) {
            Ok(report) => DaemonResponse::Synced(SyncSummary::from(&report)),
            Err(e) => DaemonResponse::Error { message: e.to_string() },
        },
    }
}

/// Snapshot of the agent for a `Status` response.
pub fn status(agent: &Agent, uptime_secs: u64) -> DaemonStatus {
    DaemonStatus {
        pid: std::process::id(),
        uptime_secs,
        ready: agent.is_ready(),
        not_ready_reason: agent.not_ready_reason().map(str::to_string),
        state: agent.state(),
        label: agent.label().to_string(),
        last_sync: agent.last_sync().and_then(wgs_ipc::timestamp),
    }
}

/// Reads one request from `stream`, answers it, and returns true if the
/// daemon should shut down.
pub fn serve<S: Read + Write>(
    stream: &mut S,
    agent: &mut Agent,
    uptime_secs: u64,
    now: u64,
) -> bool {
    let request: DaemonRequest = match framing::read_message(stream) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!("failed to read request: {}", e);
            return false;
        }
    };
    tracing::debug!("request: {:?}", request);

    let response = handle_request(request, agent, uptime_secs, now);
    let should_shutdown = matches!(response, DaemonResponse::ShuttingDown);
    if let Err(e) = framing::write_message(stream, &response) {
        tracing::warn!("failed to write response: {}", e);
    }
    should_shutdown
}

#[cfg(test)]
#[path = "ipc_tests.rs"]
mod tests;
