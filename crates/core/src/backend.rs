// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! External backends: tunnel bring-up/down, remote shell, file transfer.
//!
//! Each backend is a trait so the controllers can be driven by fakes in
//! tests. The process adapters shell out to `wg-quick`, `ssh` and `rsync`
//! and translate their failures into a structured [`BackendError`].

use std::ffi::OsString;
use std::fmt;
use std::io::ErrorKind;
use std::net::Ipv4Addr;
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Tunnel backend executable.
pub const TUNNEL_PROGRAM: &str = "wg-quick";
/// Remote shell executable.
pub const SHELL_PROGRAM: &str = "ssh";

/// Substring `wg-quick` prints when the peer endpoint does not resolve.
const DNS_FAILURE_MARKER: &str = "No address associated with hostname";

/// Non-interactive ssh options: no host key verification, never prompt.
const SSH_OPTIONS: [&str; 6] = [
    "-o",
    "StrictHostKeyChecking=no",
    "-o",
    "BatchMode=yes",
    "-o",
    "UserKnownHostsFile=/dev/null",
];

/// Error type for backend invocations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The executable could not be located.
    #[error("{program} not found")]
    Missing { program: String },

    /// The peer endpoint hostname did not resolve. Worth retrying.
    #[error("peer hostname could not be resolved: {0}")]
    DnsResolution(String),

    /// The backend ran and reported failure.
    #[error("{program} failed ({status}): {stderr}")]
    Failed { program: String, status: String, stderr: String },

    /// The backend could not be started for another reason.
    #[error("failed to run {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Login on the remote host, reached through the tunnel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteHost {
    pub user: String,
    pub address: Ipv4Addr,
}

impl RemoteHost {
    pub fn new(user: impl Into<String>, address: Ipv4Addr) -> Self {
        RemoteHost { user: user.into(), address }
    }
}

impl fmt::Display for RemoteHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.user, self.address)
    }
}

/// Brings the tunnel interface up and down from a descriptor file.
pub trait TunnelBackend {
    /// Tears the interface down. Callers treat anything but
    /// [`BackendError::Missing`] as ignorable.
    fn bring_down(&mut self, descriptor: &Path) -> Result<(), BackendError>;

    /// Brings the interface up.
    fn bring_up(&mut self, descriptor: &Path) -> Result<(), BackendError>;
}

/// Runs a single command on the remote host.
pub trait RemoteShell {
    fn run(&mut self, host: &RemoteHost, command: &str) -> Result<(), BackendError>;
}

/// Copies a local path to a destination on the remote host.
pub trait FileTransfer {
    /// Transfers `source` to `destination` and returns the backend's stdout,
    /// which carries the transfer statistics.
    fn transfer(
        &mut self,
        source: &Path,
        host: &RemoteHost,
        destination: &str,
    ) -> Result<String, BackendError>;
}

/// `wg-quick` tunnel backend.
#[derive(Debug, Clone)]
pub struct WgQuick {
    program: String,
}

impl WgQuick {
    pub fn new() -> Self {
        Self::with_program(TUNNEL_PROGRAM)
    }

    /// Uses a different executable in place of `wg-quick`.
    pub fn with_program(program: impl Into<String>) -> Self {
        WgQuick { program: program.into() }
    }
}

impl Default for WgQuick {
    fn default() -> Self {
        Self::new()
    }
}

impl TunnelBackend for WgQuick {
    fn bring_down(&mut self, descriptor: &Path) -> Result<(), BackendError> {
        let output = run(
            &self.program,
            Command::new(&self.program)
                .arg("down")
                .arg(descriptor)
                .stdout(Stdio::null())
                .stderr(Stdio::piped()),
        )?;
        check(&self.program, output).map(|_| ())
    }

    fn bring_up(&mut self, descriptor: &Path) -> Result<(), BackendError> {
        let output = run(
            &self.program,
            Command::new(&self.program)
                .arg("up")
                .arg(descriptor)
                .stdout(Stdio::null())
                .stderr(Stdio::piped()),
        )?;
        match check(&self.program, output) {
            Ok(_) => Ok(()),
            Err(BackendError::Failed { program, status, stderr }) => {
                Err(classify_up_failure(program, status, stderr))
            }
            Err(e) => Err(e),
        }
    }
}

/// Splits bring-up failures into retryable DNS failures and everything else.
pub(crate) fn classify_up_failure(program: String, status: String, stderr: String) -> BackendError {
    if stderr.contains(DNS_FAILURE_MARKER) {
        BackendError::DnsResolution(stderr)
    } else {
        BackendError::Failed { program, status, stderr }
    }
}

/// `ssh` remote shell.
#[derive(Debug, Clone)]
pub struct Ssh {
    program: String,
}

impl Ssh {
    pub fn new() -> Self {
        Self::with_program(SHELL_PROGRAM)
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Ssh { program: program.into() }
    }
}

impl Default for Ssh {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteShell for Ssh {
    fn run(&mut self, host: &RemoteHost, command: &str) -> Result<(), BackendError> {
        let output = run(
            &self.program,
            Command::new(&self.program)
                .args(ssh_args(host, command))
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::piped()),
        )?;
        check(&self.program, output).map(|_| ())
    }
}

pub(crate) fn ssh_args(host: &RemoteHost, command: &str) -> Vec<String> {
    let mut args: Vec<String> = SSH_OPTIONS.iter().map(|s| s.to_string()).collect();
    args.push(host.to_string());
    args.push(command.to_string());
    args
}

/// `rsync` file transfer over the non-interactive ssh transport.
#[derive(Debug, Clone)]
pub struct Rsync {
    program: String,
}

impl Rsync {
    pub fn new() -> Self {
        Self::with_program(crate::config::TRANSFER_PROGRAM)
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Rsync { program: program.into() }
    }
}

impl Default for Rsync {
    fn default() -> Self {
        Self::new()
    }
}

impl FileTransfer for Rsync {
    fn transfer(
        &mut self,
        source: &Path,
        host: &RemoteHost,
        destination: &str,
    ) -> Result<String, BackendError> {
        let output = run(
            &self.program,
            Command::new(&self.program)
                .args(rsync_args(source, host, destination))
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped()),
        )?;
        check(&self.program, output)
    }
}

/// Archive mode, compressed, with `--stats` so created files can be counted.
pub(crate) fn rsync_args(source: &Path, host: &RemoteHost, destination: &str) -> Vec<OsString> {
    let transport = format!("{} {}", SHELL_PROGRAM, SSH_OPTIONS.join(" "));
    vec![
        OsString::from("-avz"),
        OsString::from("--stats"),
        OsString::from("-e"),
        OsString::from(transport),
        source.as_os_str().to_os_string(),
        OsString::from(format!("{}:{}", host, destination)),
    ]
}

/// Quotes a path for the remote POSIX shell.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

fn run(program: &str, command: &mut Command) -> Result<Output, BackendError> {
    command.output().map_err(|e| match e.kind() {
        ErrorKind::NotFound => BackendError::Missing { program: program.to_string() },
        _ => BackendError::Io { program: program.to_string(), source: e },
    })
}

/// Returns stdout on success, otherwise a [`BackendError::Failed`] with trimmed stderr.
fn check(program: &str, output: Output) -> Result<String, BackendError> {
    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        Err(BackendError::Failed {
            program: program.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
