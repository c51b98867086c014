// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `wgsync down`: bring the tunnel down.
//!
//! Needs only the tunnel part of the config, so it works even when the
//! sync side is not ready.

use std::io::Write;
use std::path::Path;

use wgs_core::backend::{TunnelBackend, WgQuick};
use wgs_core::tunnel::TunnelController;
use wgs_core::{ConnectionState, LogReporter, StatusBoard, ThreadSleeper};

use crate::error::Result;

pub fn run(config_path: &Path) -> Result<()> {
    run_impl(config_path, Box::new(WgQuick::new()), &mut std::io::stdout())
}

pub(crate) fn run_impl<W: Write>(
    config_path: &Path,
    backend: Box<dyn TunnelBackend>,
    out: &mut W,
) -> Result<()> {
    let settings = super::load_settings(config_path)?;
    if !settings.descriptor_path.exists() {
        writeln!(out, "no descriptor at {}, nothing to bring down", settings.descriptor_path.display())?;
        return Ok(());
    }

    let mut controller = TunnelController::new(
        settings.tunnel,
        settings.descriptor_path.clone(),
        backend,
        Box::new(ThreadSleeper),
    );
    let mut state = ConnectionState::Up;
    let mut status = StatusBoard::new(Box::new(LogReporter));
    controller.teardown(&mut state, &mut status);
    writeln!(out, "tunnel: {}", status.current())?;
    Ok(())
}

#[cfg(test)]
#[path = "down_tests.rs"]
mod tests;
