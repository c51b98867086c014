// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! IPC client for communicating with the wgsyncd daemon.

use std::os::unix::net::UnixStream;
use std::path::Path;
use std::time::Duration;

use wgs_ipc::{framing, DaemonRequest, DaemonResponse, DaemonStatus, SyncSummary};

use crate::error::{Error, Result};

/// Timeout for quick requests.
const TIMEOUT_SECS: u64 = 5;
/// A forced sync waits on the transfers themselves.
const SYNC_TIMEOUT_SECS: u64 = 600;

/// A client connection to the daemon.
pub struct DaemonClient {
    stream: UnixStream,
}

impl DaemonClient {
    /// Connect to the daemon at the given socket path.
    pub fn connect(socket_path: &Path) -> Result<Self> {
        let stream = UnixStream::connect(socket_path).map_err(Error::DaemonConnect)?;
        stream
            .set_read_timeout(Some(Duration::from_secs(TIMEOUT_SECS)))
            .map_err(|e| Error::Daemon(format!("failed to set read timeout: {}", e)))?;
        stream
            .set_write_timeout(Some(Duration::from_secs(TIMEOUT_SECS)))
            .map_err(|e| Error::Daemon(format!("failed to set write timeout: {}", e)))?;
        Ok(DaemonClient { stream })
    }

    /// Send a request and receive a response.
    fn request(&mut self, request: DaemonRequest) -> Result<DaemonResponse> {
        framing::write_message(&mut self.stream, &request)?;
        Ok(framing::read_message(&mut self.stream)?)
    }

    pub fn ping(&mut self) -> Result<()> {
        match self.request(DaemonRequest::Ping)? {
            DaemonResponse::Pong => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    pub fn status(&mut self) -> Result<DaemonStatus> {
        match self.request(DaemonRequest::Status)? {
            DaemonResponse::Status(status) => Ok(status),
            other => Err(unexpected(other)),
        }
    }

    /// Ask the daemon to run a sync cycle now.
    pub fn sync_now(&mut self) -> Result<SyncSummary> {
        self.stream
            .set_read_timeout(Some(Duration::from_secs(SYNC_TIMEOUT_SECS)))
            .map_err(|e| Error::Daemon(format!("failed to set read timeout: {}", e)))?;
        match self.request(DaemonRequest::SyncNow)? {
            DaemonResponse::Synced(summary) => Ok(summary),
            other => Err(unexpected(other)),
        }
    }

    /// Ask the daemon to tear down the tunnel and exit.
    pub fn shutdown(&mut self) -> Result<()> {
        match self.request(DaemonRequest::Shutdown)? {
            DaemonResponse::ShuttingDown => Ok(()),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(response: DaemonResponse) -> Error {
    match response {
        DaemonResponse::Error { message } => Error::Daemon(message),
        other => Error::Daemon(format!("unexpected response: {:?}", other)),
    }
}
