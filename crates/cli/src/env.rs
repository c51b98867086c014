// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables used by the CLI are defined here
//! with typed accessor functions. The variable name constants are generated
//! by `build.rs` and live in the [`vars`] submodule.

use std::path::PathBuf;

use wgs_core::config::DEFAULT_CONFIG_PATH;

/// Generated environment variable name constants.
pub mod vars {
    include!(concat!(env!("OUT_DIR"), "/env_vars.rs"));
}

/// Returns `true` if `NO_COLOR=1`.
pub fn no_color() -> bool {
    std::env::var(vars::NO_COLOR).is_ok_and(|v| v == "1")
}

/// Returns `true` if `COLOR=1`.
pub fn force_color() -> bool {
    std::env::var(vars::COLOR).is_ok_and(|v| v == "1")
}

/// Returns the value of `WGSYNC_CONFIG` if set.
pub fn config_path() -> Option<PathBuf> {
    std::env::var(vars::WGSYNC_CONFIG).ok().map(PathBuf::from)
}

/// Returns the value of `WGSYNC_STATE_DIR` if set.
pub fn state_dir() -> Option<PathBuf> {
    std::env::var(vars::WGSYNC_STATE_DIR).ok().map(PathBuf::from)
}

/// Returns the value of `XDG_STATE_HOME` if set.
pub fn xdg_state_home() -> Option<PathBuf> {
    std::env::var(vars::XDG_STATE_HOME).ok().map(PathBuf::from)
}

/// Resolves the config file: explicit flag, then `WGSYNC_CONFIG`, then the default.
pub fn resolve_config(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(config_path).unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Resolves the daemon state directory: explicit flag, then
/// `WGSYNC_STATE_DIR`, then `$XDG_STATE_HOME/wgsync`, then `~/.local/state/wgsync`.
pub fn resolve_state_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(state_dir)
        .or_else(|| xdg_state_home().map(|dir| dir.join("wgsync")))
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/state/wgsync")))
        .unwrap_or_else(|| PathBuf::from(".local/state/wgsync"))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
