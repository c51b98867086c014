// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tunnel connection state machine.
//!
//! ```text
//! Starting ──► Connecting ──► Up
//!                 │  ▲
//!                 │  └── DnsRetry (after a fixed delay, up to 5 attempts)
//!                 ├──► Error           any other backend failure, no retry
//!                 ├──► Failed          attempts exhausted
//!                 └──► BackendMissing  wg-quick not installed
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backend::{BackendError, TunnelBackend};
use crate::clock::Sleeper;
use crate::descriptor::{write_descriptor, TunnelConfig};
use crate::status::{labels, StatusBoard};

/// Connection lifecycle state. Exactly one is current at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// Initial state, and the state after teardown.
    Starting,
    /// A connect attempt is in progress.
    Connecting,
    /// The peer hostname did not resolve; waiting before the next attempt.
    DnsRetry,
    /// The tunnel is up.
    Up,
    /// A non-retryable backend failure ended the last connect cycle.
    Error,
    /// Every attempt of the last connect cycle hit a DNS failure.
    Failed,
    /// The tunnel backend is not installed. Final for the process lifetime.
    BackendMissing,
}

impl ConnectionState {
    /// Returns the string representation used in IPC and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Starting => "starting",
            ConnectionState::Connecting => "connecting",
            ConnectionState::DnsRetry => "dns_retry",
            ConnectionState::Up => "up",
            ConnectionState::Error => "error",
            ConnectionState::Failed => "failed",
            ConnectionState::BackendMissing => "backend_missing",
        }
    }

    /// Returns the status label shown for this state.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Starting => labels::STARTING,
            ConnectionState::Connecting => labels::CONNECTING,
            ConnectionState::DnsRetry => labels::DNS_RETRY,
            ConnectionState::Up => labels::UP,
            ConnectionState::Error => labels::ERROR,
            ConnectionState::Failed => labels::FAILED,
            ConnectionState::BackendMissing => labels::BACKEND_MISSING,
        }
    }

    /// States in which a new connect cycle must not start.
    pub fn is_active(&self) -> bool {
        matches!(self, ConnectionState::Up | ConnectionState::Connecting | ConnectionState::DnsRetry)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Retry bounds for one connect cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Delay after a DNS failure before the next attempt.
    pub dns_retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy { max_attempts: 5, dns_retry_delay: Duration::from_secs(10) }
    }
}

/// Owns the tunnel backend and drives the connect state machine.
///
/// The state itself is owned by the caller and passed in by reference.
pub struct TunnelController {
    config: TunnelConfig,
    descriptor_path: PathBuf,
    backend: Box<dyn TunnelBackend>,
    sleeper: Box<dyn Sleeper>,
    policy: RetryPolicy,
}

impl TunnelController {
    pub fn new(
        config: TunnelConfig,
        descriptor_path: PathBuf,
        backend: Box<dyn TunnelBackend>,
        sleeper: Box<dyn Sleeper>,
    ) -> Self {
        TunnelController { config, descriptor_path, backend, sleeper, policy: RetryPolicy::default() }
    }

    /// Replaces the default retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn descriptor_path(&self) -> &Path {
        &self.descriptor_path
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Brings the tunnel up unless it is already up or connecting.
    ///
    /// Each attempt tears down any stale interface, rewrites the descriptor,
    /// and invokes bring-up. DNS failures are retried after a fixed delay;
    /// any other failure ends the cycle immediately. Returns the state the
    /// cycle ended in.
    pub fn ensure_connected(
        &mut self,
        state: &mut ConnectionState,
        status: &mut StatusBoard,
    ) -> ConnectionState {
        if state.is_active() || *state == ConnectionState::BackendMissing {
            tracing::debug!("connect skipped, state is {}", state);
            return *state;
        }

        let max = self.policy.max_attempts;
        for attempt in 1..=max {
            tracing::info!("attempting to connect (attempt {}/{})", attempt, max);
            transition(state, ConnectionState::Connecting, status);

            if let Err(BackendError::Missing { program }) =
                self.backend.bring_down(&self.descriptor_path)
            {
                tracing::error!("{} is not installed, tunnel disabled", program);
                transition(state, ConnectionState::BackendMissing, status);
                return *state;
            }

            if let Err(e) = write_descriptor(&self.descriptor_path, &self.config.render()) {
                tracing::error!(
                    "failed to write tunnel descriptor {}: {}",
                    self.descriptor_path.display(),
                    e
                );
                transition(state, ConnectionState::Error, status);
                return *state;
            }

            match self.backend.bring_up(&self.descriptor_path) {
                Ok(()) => {
                    tracing::info!("connection established");
                    transition(state, ConnectionState::Up, status);
                    return *state;
                }
                Err(BackendError::DnsResolution(detail)) => {
                    tracing::warn!("peer endpoint did not resolve: {}", detail);
                    transition(state, ConnectionState::DnsRetry, status);
                    if attempt < max {
                        self.sleeper.sleep(self.policy.dns_retry_delay);
                    }
                }
                Err(BackendError::Missing { program }) => {
                    tracing::error!("{} is not installed, tunnel disabled", program);
                    transition(state, ConnectionState::BackendMissing, status);
                    return *state;
                }
                Err(e) => {
                    tracing::error!("connection failed: {}", e);
                    transition(state, ConnectionState::Error, status);
                    return *state;
                }
            }
        }

        tracing::error!("failed to establish connection after {} attempts", max);
        transition(state, ConnectionState::Failed, status);
        *state
    }

    /// Best-effort bring-down. Never fails.
    ///
    /// Only issued when a descriptor was rendered, since without one there
    /// is no interface this process brought up.
    pub fn teardown(&mut self, state: &mut ConnectionState, status: &mut StatusBoard) {
        if self.descriptor_path.exists() {
            if let Err(e) = self.backend.bring_down(&self.descriptor_path) {
                tracing::debug!("teardown ignored failure: {}", e);
            }
        }
        if *state != ConnectionState::BackendMissing {
            *state = ConnectionState::Starting;
        }
        status.set(labels::DOWN);
    }
}

fn transition(state: &mut ConnectionState, next: ConnectionState, status: &mut StatusBoard) {
    *state = next;
    status.set(next.label());
}

#[cfg(test)]
#[path = "tunnel_tests.rs"]
mod tests;
