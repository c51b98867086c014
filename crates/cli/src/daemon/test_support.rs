// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! A scripted stand-in for wgsyncd.

#![allow(clippy::unwrap_used)]

use std::os::unix::net::UnixListener;
use std::path::Path;
use std::thread::JoinHandle;

use wgs_ipc::{framing, DaemonRequest, DaemonResponse};

use super::{get_pid_path, get_socket_path};

/// A PID no live process has.
pub const DEAD_PID: u32 = 2_147_483_646;

/// Serves one connection per scripted response, returning the requests seen.
pub fn fake_daemon(dir: &Path, responses: Vec<DaemonResponse>) -> JoinHandle<Vec<DaemonRequest>> {
    let listener = UnixListener::bind(get_socket_path(dir)).unwrap();
    std::fs::write(get_pid_path(dir), DEAD_PID.to_string()).unwrap();
    std::thread::spawn(move || {
        let mut seen = Vec::new();
        for response in responses {
            let (mut stream, _) = listener.accept().unwrap();
            seen.push(framing::read_message(&mut stream).unwrap());
            framing::write_message(&mut stream, &response).unwrap();
        }
        seen
    })
}
