// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Network connectivity detection.
//!
//! The host environment signals "internet available" by having a default
//! route. The daemon polls a probe and feeds edges into the agent.

use std::fs;
use std::path::PathBuf;

/// Kernel IPv4 routing table.
pub const ROUTE_TABLE_PATH: &str = "/proc/net/route";

/// `RTF_UP` from the kernel route flags.
const RTF_UP: u32 = 0x1;

/// Reports whether the host currently has network connectivity.
pub trait ConnectivityProbe {
    fn is_online(&self) -> bool;
}

/// Probe that looks for an active default route in the routing table.
#[derive(Debug, Clone)]
pub struct RouteTableProbe {
    path: PathBuf,
}

impl RouteTableProbe {
    pub fn new() -> Self {
        Self::with_path(ROUTE_TABLE_PATH)
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        RouteTableProbe { path: path.into() }
    }
}

impl Default for RouteTableProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectivityProbe for RouteTableProbe {
    fn is_online(&self) -> bool {
        match fs::read_to_string(&self.path) {
            Ok(table) => has_default_route(&table),
            Err(e) => {
                tracing::debug!("cannot read {}: {}", self.path.display(), e);
                false
            }
        }
    }
}

/// Returns true if `table` (in `/proc/net/route` format) has a default
/// route that is up.
pub fn has_default_route(table: &str) -> bool {
    table.lines().skip(1).any(|line| {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let (Some(destination), Some(flags)) = (fields.get(1), fields.get(3)) else {
            return false;
        };
        let up = u32::from_str_radix(flags, 16).is_ok_and(|f| f & RTF_UP != 0);
        *destination == "00000000" && up
    })
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
