// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Talking to the wgsyncd daemon.
//!
//! The daemon runs under an init system; the CLI only finds it through its
//! state directory and speaks to it over the Unix socket.

mod client;
mod lifecycle;

pub use client::DaemonClient;
pub use lifecycle::{detect_daemon, get_pid_path, get_socket_path, stop_daemon, DaemonInfo};
pub use wgs_ipc::DaemonStatus;


#[cfg(test)]
pub(crate) mod test_support;
