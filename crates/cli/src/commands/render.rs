// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `wgsync render`: print the tunnel descriptor with keys redacted.

use std::io::Write;
use std::path::Path;

use crate::error::Result;

pub fn run(config_path: &Path) -> Result<()> {
    run_impl(config_path, &mut std::io::stdout())
}

pub(crate) fn run_impl<W: Write>(config_path: &Path, out: &mut W) -> Result<()> {
    let settings = super::load_settings(config_path)?;
    write!(out, "{}", settings.tunnel.render_redacted())?;
    Ok(())
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
