// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod check;
pub mod daemon;
pub mod down;
pub mod once;
pub mod render;

use std::path::Path;

use wgs_core::config::{self, Settings};

use crate::error::Result;

/// Loads the config file and resolves settings without checking for
/// installed programs.
pub fn load_settings(config_path: &Path) -> Result<Settings> {
    let table = config::load_table(config_path)?;
    Ok(Settings::from_table(&table)?)
}

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
