// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Agents wired to in-process backends for daemon tests.

#![allow(clippy::unwrap_used)]

use std::path::Path;
use std::time::Duration;

use tempfile::TempDir;
use wgs_core::backend::{BackendError, FileTransfer, RemoteHost, RemoteShell, TunnelBackend};
use wgs_core::{Agent, Backends, LogReporter, Settings, Sleeper};

/// Backend that succeeds at everything and reports 1,024 new files.
struct Accept;

impl TunnelBackend for Accept {
    fn bring_down(&mut self, _descriptor: &Path) -> Result<(), BackendError> {
        Ok(())
    }

    fn bring_up(&mut self, _descriptor: &Path) -> Result<(), BackendError> {
        Ok(())
    }
}

impl RemoteShell for Accept {
    fn run(&mut self, _host: &RemoteHost, _command: &str) -> Result<(), BackendError> {
        Ok(())
    }
}

impl FileTransfer for Accept {
    fn transfer(
        &mut self,
        _source: &Path,
        _host: &RemoteHost,
        _destination: &str,
    ) -> Result<String, BackendError> {
        Ok("Number of created files: 1,024 (reg: 1,024)\n".to_string())
    }
}

impl Sleeper for Accept {
    fn sleep(&self, _duration: Duration) {}
}

fn backends() -> Backends {
    Backends {
        tunnel: Box::new(Accept),
        shell: Box::new(Accept),
        transfer: Box::new(Accept),
        sleeper: Box::new(Accept),
    }
}

/// A ready agent whose descriptor lives in `temp`.
pub fn ready_agent(temp: &TempDir) -> Agent {
    let table: toml::Table = toml::from_str(&format!(
        r#"
        private_key = "cHJpdmF0ZQ=="
        peer_public_key = "cHVibGlj"
        peer_endpoint = "vpn.example.com:51820"
        local_address = "10.8.0.5/24"
        remote_user = "pi"
        remote_base_dir = "/srv/loot"
        device_name = "pwn01"
        wg_config_path = "{}"
        "#,
        temp.path().join("wg0.conf").display()
    ))
    .unwrap();
    Agent::new(Settings::from_table(&table), backends(), Box::new(LogReporter))
}

/// An agent that failed validation.
pub fn inert_agent() -> Agent {
    let table: toml::Table = toml::from_str("private_key = \"x\"").unwrap();
    Agent::new(Settings::from_table(&table), backends(), Box::new(LogReporter))
}
