// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! wgs-core: tunnel lifecycle and artifact sync for wgsync
//!
//! This crate provides the connection state machine, remote provisioning,
//! sync scheduling, and the backend adapters shared by the wgsync CLI and
//! the wgsyncd daemon.

pub mod agent;
pub mod backend;
pub mod clock;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod identity;
pub mod probe;
pub mod provision;
pub mod status;
pub mod sync;
pub mod tunnel;

#[cfg(test)]
mod test_helpers;

pub use agent::{Agent, Backends};
pub use clock::{ClockSource, Sleeper, SystemClock, ThreadSleeper};
pub use config::Settings;
pub use descriptor::{LocalAddress, TunnelConfig};
pub use error::{Error, Result};
pub use probe::{ConnectivityProbe, RouteTableProbe};
pub use status::{FileReporter, LogReporter, StatusBoard, StatusReporter};
pub use sync::{SyncReport, SyncTarget};
pub use tunnel::ConnectionState;
