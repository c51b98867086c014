// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Device identity detection.
//!
//! The device identifier names this machine's directory on the remote side,
//! so it must stay stable across restarts.

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;

use std::path::Path;
use std::process::Command;

const FALLBACK_NAME: &str = "device";

/// Returns the identifier used for this device's remote directory.
///
/// Resolution order:
/// 1. The configured `device_name`, if any
/// 2. Output of the `hostname` command
/// 3. Contents of `/etc/hostname`
/// 4. Fallback to "device"
pub fn device_identifier(configured: Option<&str>) -> String {
    let candidates = [
        configured.map(str::to_string),
        get_hostname_command(),
        read_hostname_file(Path::new("/etc/hostname")),
    ];

    candidates
        .into_iter()
        .flatten()
        .map(|name| sanitize(&name))
        .find(|name| !is_placeholder(name))
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}

fn get_hostname_command() -> Option<String> {
    let output = Command::new("hostname").output().ok()?;

    if output.status.success() {
        let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !name.is_empty() {
            return Some(name);
        }
    }
    None
}

fn read_hostname_file(path: &Path) -> Option<String> {
    std::fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Maps anything outside `[A-Za-z0-9._-]` to `-` so the name is a safe path segment.
fn sanitize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '-' })
        .collect()
}

fn is_placeholder(name: &str) -> bool {
    matches!(
        name.to_lowercase().as_str(),
        "" | "localhost" | "localhost.localdomain" | "." | ".."
    )
}
