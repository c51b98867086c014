// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote directory provisioning.
//!
//! Destination directories are recreated idempotently (`mkdir -p`) before
//! every transfer cycle instead of being checked for prior existence.

use crate::backend::{shell_quote, RemoteHost, RemoteShell};
use crate::error::{Error, Result};

/// Creates destination directories on the remote host over the remote shell.
pub struct RemoteProvisioner {
    host: RemoteHost,
    shell: Box<dyn RemoteShell>,
}

impl RemoteProvisioner {
    pub fn new(host: RemoteHost, shell: Box<dyn RemoteShell>) -> Self {
        RemoteProvisioner { host, shell }
    }

    pub fn host(&self) -> &RemoteHost {
        &self.host
    }

    /// Ensures `dir` exists on the remote host, creating parents as needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Provision`] if the remote command fails or the
    /// remote shell is unavailable.
    pub fn ensure_dir(&mut self, dir: &str) -> Result<()> {
        let command = format!("mkdir -p {}", shell_quote(dir));
        tracing::debug!("provisioning {}:{}", self.host, dir);
        self.shell
            .run(&self.host, &command)
            .map_err(|e| Error::Provision(format!("{}:{}: {}", self.host, dir, e)))
    }
}

#[cfg(test)]
#[path = "provision_tests.rs"]
mod tests;
