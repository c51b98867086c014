// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `wgsync check`: report whether the agent would start.

use std::io::Write;
use std::path::Path;

use serde_json::json;
use wgs_core::backend::{SHELL_PROGRAM, TUNNEL_PROGRAM};
use wgs_core::config;

use crate::cli::OutputFormat;
use crate::colors;
use crate::error::Result;

pub fn run(config_path: &Path, output: OutputFormat) -> Result<()> {
    run_impl(config_path, output, config::program_on_path, &mut std::io::stdout())
}

/// Validates the config exactly as the daemon does at startup.
///
/// Fails with the validation error when not ready. Missing tunnel or shell
/// programs are warnings only: they disable connecting or provisioning
/// later, not startup.
pub(crate) fn run_impl<F, W>(
    config_path: &Path,
    output: OutputFormat,
    has_program: F,
    out: &mut W,
) -> Result<()>
where
    F: Fn(&str) -> bool,
    W: Write,
{
    let table = config::load_table(config_path)?;
    let settings = config::validate(&table, &has_program)?;

    let missing: Vec<&str> =
        [TUNNEL_PROGRAM, SHELL_PROGRAM].into_iter().filter(|p| !has_program(*p)).collect();

    let host = format!("{}@{}", settings.target.remote_user, settings.tunnel.gateway());
    match output {
        OutputFormat::Json => {
            let report = json!({
                "ready": true,
                "config": config_path.display().to_string(),
                "device": settings.target.device_identifier,
                "remote_host": host,
                "remote_dir": settings.target.remote_artifact_dir,
                "sync_interval_secs": settings.sync_interval_secs,
                "backup_archive": settings.backup_archive.as_ref().map(|p| p.display().to_string()),
                "missing_programs": missing,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        }
        OutputFormat::Text => {
            writeln!(out, "{} {}", colors::header("ready:"), config_path.display())?;
            writeln!(out, "  device:   {}", settings.target.device_identifier)?;
            writeln!(out, "  remote:   {}:{}", host, settings.target.remote_artifact_dir)?;
            writeln!(out, "  interval: {}s", settings.sync_interval_secs)?;
            match &settings.backup_archive {
                Some(archive) => writeln!(out, "  backup:   {}", archive.display())?,
                None => writeln!(out, "  backup:   {}", colors::context("(disabled)"))?,
            }
            for program in &missing {
                writeln!(out, "warning: {} not found on PATH", program)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "check_tests.rs"]
mod tests;
