// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for command tests.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use tempfile::TempDir;

/// A complete config written into a temp dir.
pub struct ConfigFixture {
    pub temp: TempDir,
    pub path: PathBuf,
}

impl ConfigFixture {
    pub fn new(extra: &str) -> Self {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        let descriptor = temp.path().join("wg0.conf");
        std::fs::write(
            &path,
            format!(
                r#"private_key = "cHJpdmF0ZQ=="
peer_public_key = "cHVibGlj"
peer_endpoint = "vpn.example.com:51820"
local_address = "10.8.0.5/24"
remote_user = "pi"
remote_base_dir = "/srv/loot"
device_name = "pwn01"
wg_config_path = "{}"
{}
"#,
                descriptor.display(),
                extra
            ),
        )
        .unwrap();
        ConfigFixture { temp, path }
    }

    pub fn descriptor(&self) -> PathBuf {
        self.temp.path().join("wg0.conf")
    }
}

/// Runs `f` against a byte buffer and returns what it wrote.
pub fn capture<F>(f: F) -> String
where
    F: FnOnce(&mut Vec<u8>),
{
    let mut out = Vec::new();
    f(&mut out);
    String::from_utf8(out).unwrap()
}
