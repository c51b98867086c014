// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Entry points driven by an external scheduler.
//!
//! [`Agent`] owns the lifecycle state (connection state, last-sync record,
//! status board) and wires the tunnel controller and sync orchestrator to
//! the same backends. Configuration is validated once, at construction; an
//! agent that fails validation stays inert for its whole lifetime.

use std::path::Path;

use crate::backend::{
    FileTransfer, RemoteHost, RemoteShell, Rsync, Ssh, TunnelBackend, WgQuick,
};
use crate::clock::{Sleeper, ThreadSleeper};
use crate::config::{self, Settings};
use crate::error::{Error, Result};
use crate::provision::RemoteProvisioner;
use crate::status::{StatusBoard, StatusReporter};
use crate::sync::{SyncOrchestrator, SyncRecord, SyncReport};
use crate::tunnel::{ConnectionState, TunnelController};

/// External collaborators the agent drives.
pub struct Backends {
    pub tunnel: Box<dyn TunnelBackend>,
    pub shell: Box<dyn RemoteShell>,
    pub transfer: Box<dyn FileTransfer>,
    pub sleeper: Box<dyn Sleeper>,
}

impl Backends {
    /// `wg-quick`, `ssh` and `rsync` from `PATH`, with real sleeps.
    pub fn system() -> Self {
        Backends {
            tunnel: Box::new(WgQuick::new()),
            shell: Box::new(Ssh::new()),
            transfer: Box::new(Rsync::new()),
            sleeper: Box::new(ThreadSleeper),
        }
    }
}

struct Controllers {
    settings: Settings,
    tunnel: TunnelController,
    sync: SyncOrchestrator,
}

/// The tunnel and sync lifecycle behind two entry points:
/// [`on_connectivity`](Self::on_connectivity) and [`shutdown`](Self::shutdown).
pub struct Agent {
    controllers: Option<Controllers>,
    not_ready: Option<String>,
    state: ConnectionState,
    record: SyncRecord,
    status: StatusBoard,
}

impl Agent {
    /// Builds an agent from an already validated configuration.
    ///
    /// A validation error makes the agent permanently inert; it is logged
    /// here and nowhere else.
    pub fn new(
        validated: Result<Settings>,
        backends: Backends,
        reporter: Box<dyn StatusReporter>,
    ) -> Self {
        let status = StatusBoard::new(reporter);
        let settings = match validated {
            Ok(settings) => settings,
            Err(e) => {
                tracing::error!("not ready, connection and sync disabled: {}", e);
                return Agent {
                    controllers: None,
                    not_ready: Some(e.to_string()),
                    state: ConnectionState::Starting,
                    record: SyncRecord::new(0),
                    status,
                };
            }
        };

        let host = RemoteHost::new(settings.target.remote_user.clone(), settings.tunnel.gateway());
        let tunnel = TunnelController::new(
            settings.tunnel.clone(),
            settings.descriptor_path.clone(),
            backends.tunnel,
            backends.sleeper,
        );
        let sync = SyncOrchestrator::new(
            settings.target.clone(),
            settings.source_dir.clone(),
            RemoteProvisioner::new(host, backends.shell),
            backends.transfer,
        )
        .with_backup(settings.backup_archive.clone())
        .with_hold_secs(settings.status_hold_secs);

        tracing::info!(
            device = %settings.target.device_identifier,
            remote = %settings.target.remote_artifact_dir,
            "ready"
        );

        Agent {
            record: SyncRecord::new(settings.sync_interval_secs),
            controllers: Some(Controllers { settings, tunnel, sync }),
            not_ready: None,
            state: ConnectionState::Starting,
            status,
        }
    }

    /// Validates `table` (required keys, then `rsync` on `PATH`) and builds an agent.
    pub fn from_table(
        table: &toml::Table,
        backends: Backends,
        reporter: Box<dyn StatusReporter>,
    ) -> Self {
        Self::new(config::validate(table, config::program_on_path), backends, reporter)
    }

    /// Reads and validates the config file at `path` and builds an agent.
    pub fn load(path: &Path, backends: Backends, reporter: Box<dyn StatusReporter>) -> Self {
        let validated = config::load_table(path)
            .and_then(|table| config::validate(&table, config::program_on_path));
        Self::new(validated, backends, reporter)
    }

    pub fn is_ready(&self) -> bool {
        self.controllers.is_some()
    }

    /// Why the agent is inert, if it is.
    pub fn not_ready_reason(&self) -> Option<&str> {
        self.not_ready.as_deref()
    }

    pub fn settings(&self) -> Option<&Settings> {
        self.controllers.as_ref().map(|c| &c.settings)
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// The status label currently displayed.
    pub fn label(&self) -> &str {
        self.status.current()
    }

    /// Unix seconds of the last attempted sync cycle.
    pub fn last_sync(&self) -> Option<u64> {
        Some(self.record.last_sync_timestamp).filter(|&t| t > 0)
    }

    /// Applies any due status restore.
    pub fn tick(&mut self, now: u64) {
        self.status.tick(now);
    }

    /// Handles a "connectivity available" event.
    ///
    /// Connects unless the tunnel is already up or a connect is in progress,
    /// then syncs if the tunnel is up and the interval has elapsed. Returns
    /// the report of the sync cycle, if one ran.
    pub fn on_connectivity(&mut self, now: u64) -> Option<SyncReport> {
        let Some(controllers) = self.controllers.as_mut() else {
            tracing::debug!("ignoring connectivity event, not ready");
            return None;
        };
        self.status.tick(now);

        if !self.state.is_active() {
            controllers.tunnel.ensure_connected(&mut self.state, &mut self.status);
        }
        controllers.sync.maybe_sync(now, self.state, &mut self.record, &mut self.status)
    }

    /// Runs a sync cycle now, ignoring the cooldown. The cooldown still
    /// restarts from `now`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the agent is not ready, or
    /// [`Error::Connect`] if the tunnel is not up.
    pub fn sync_now(&mut self, now: u64) -> Result<SyncReport> {
        let Some(controllers) = self.controllers.as_mut() else {
            return Err(Error::Config(self.not_ready.clone().unwrap_or_default()));
        };
        if self.state != ConnectionState::Up {
            return Err(Error::Connect(format!("tunnel is {}", self.state)));
        }
        self.status.tick(now);
        let report = controllers.sync.run_cycle(now, &mut self.status);
        self.record.mark(now);
        Ok(report)
    }

    /// Handles unload: best-effort tunnel teardown.
    pub fn shutdown(&mut self) {
        match self.controllers.as_mut() {
            Some(controllers) => {
                tracing::info!("shutting down, disconnecting tunnel");
                controllers.tunnel.teardown(&mut self.state, &mut self.status);
            }
            None => tracing::debug!("shutdown while not ready, nothing to tear down"),
        }
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("ready", &self.is_ready())
            .field("state", &self.state)
            .field("record", &self.record)
            .field("status", &self.status)
            .finish()
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
