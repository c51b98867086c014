// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// `wgsync` with the environment isolated from the host.
pub fn wgsync(temp: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("wgsync");
    cmd.env_remove("WGSYNC_CONFIG")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .env("WGSYNC_STATE_DIR", temp.path().join("state"));
    cmd
}

/// Writes a config file into `temp` and returns its path.
pub fn write_config(temp: &TempDir, contents: &str) -> PathBuf {
    let path = temp.path().join("config.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

/// A complete config whose descriptor path lives in `temp`.
pub fn full_config(temp: &TempDir) -> PathBuf {
    write_config(
        temp,
        &format!(
            r#"private_key = "cHJpdmF0ZQ=="
peer_public_key = "cHVibGlj"
peer_endpoint = "vpn.example.com:51820"
local_address = "10.8.0.5/24"
remote_user = "pi"
remote_base_dir = "/srv/loot"
device_name = "pwn01"
wg_config_path = "{}"
"#,
            temp.path().join("wg0.conf").display()
        ),
    )
}
