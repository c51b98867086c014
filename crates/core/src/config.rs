// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration loading and validation.
//!
//! Configuration is a TOML file (default `/etc/wgsync/config.toml`). The raw
//! table is checked for required keys first so that every missing key is
//! reported at once, then it is deserialized into [`RawConfig`] and resolved
//! into the immutable [`Settings`] the rest of the crate reads.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::descriptor::{LocalAddress, TunnelConfig};
use crate::error::{Error, Result};
use crate::identity::device_identifier;
use crate::sync::SyncTarget;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/wgsync/config.toml";

/// Keys that must be present regardless of remote layout.
pub const REQUIRED_KEYS: [&str; 5] =
    ["private_key", "peer_public_key", "peer_endpoint", "local_address", "remote_user"];

/// Remote layout key: per-device directories under a base directory.
const LAYOUT_KEY: &str = "remote_base_dir";
/// Legacy remote layout key: one flat artifact directory.
const LEGACY_LAYOUT_KEY: &str = "handshake_dir";

/// Older key names still accepted for required keys.
const KEY_ALIASES: [(&str, &str); 2] = [("local_address", "address"), ("remote_user", "server_user")];

/// The file transfer backend that must be installed before anything runs.
pub const TRANSFER_PROGRAM: &str = "rsync";

/// Configuration as written in the TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfig {
    pub private_key: String,
    pub peer_public_key: String,
    /// `host:port` of the tunnel peer.
    pub peer_endpoint: String,
    /// Local tunnel address in CIDR form, e.g. `10.8.0.5/24`.
    #[serde(alias = "address")]
    pub local_address: String,
    #[serde(default = "default_dns")]
    pub dns: String,
    pub preshared_key: Option<String>,
    /// Login user on the remote host.
    #[serde(alias = "server_user")]
    pub remote_user: String,
    pub remote_base_dir: Option<String>,
    pub handshake_dir: Option<String>,
    #[serde(default = "default_sync_interval_secs")]
    pub sync_interval_secs: u64,
    /// Local directory holding captured artifacts.
    #[serde(default = "default_source_handshake_path")]
    pub source_handshake_path: PathBuf,
    /// Where the rendered tunnel descriptor is written.
    #[serde(default = "default_wg_config_path")]
    pub wg_config_path: PathBuf,
    pub device_name: Option<String>,
    #[serde(default)]
    pub sync_backup: bool,
    /// Directory holding `<device>-backup.tar.gz`.
    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,
    /// How long transient labels such as `Synced: 3` stay displayed.
    #[serde(default = "default_status_hold_secs")]
    pub status_hold_secs: u64,
}

fn default_dns() -> String {
    "1.1.1.1".to_string()
}

fn default_sync_interval_secs() -> u64 {
    600
}

fn default_source_handshake_path() -> PathBuf {
    PathBuf::from("/home/pi/handshakes/")
}

fn default_wg_config_path() -> PathBuf {
    PathBuf::from("/tmp/wg0.conf")
}

fn default_backup_dir() -> PathBuf {
    PathBuf::from("/home/pi")
}

fn default_status_hold_secs() -> u64 {
    15
}

/// Validated, immutable settings shared by every component.
#[derive(Debug, Clone)]
pub struct Settings {
    pub tunnel: TunnelConfig,
    pub target: SyncTarget,
    pub sync_interval_secs: u64,
    pub source_dir: PathBuf,
    pub descriptor_path: PathBuf,
    /// Local backup archive to push, when backup sync is enabled.
    pub backup_archive: Option<PathBuf>,
    pub status_hold_secs: u64,
}

impl Settings {
    /// Resolves settings from a raw TOML table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingKeys`] listing every absent required key, or a
    /// parse error if a present key has the wrong shape.
    pub fn from_table(table: &toml::Table) -> Result<Self> {
        let missing = missing_keys(table);
        if !missing.is_empty() {
            return Err(Error::MissingKeys(missing));
        }
        let raw: RawConfig = toml::Value::Table(table.clone()).try_into()?;
        Self::from_raw(raw)
    }

    /// Resolves settings from an already deserialized config.
    pub fn from_raw(raw: RawConfig) -> Result<Self> {
        let local_address = LocalAddress::parse(&raw.local_address)?;
        let device = device_identifier(raw.device_name.as_deref());

        let target = match (raw.remote_base_dir, raw.handshake_dir) {
            (Some(base), _) => SyncTarget::per_device(raw.remote_user, &base, device.clone()),
            (None, Some(flat)) => SyncTarget::legacy(raw.remote_user, &flat, device.clone()),
            (None, None) => return Err(Error::MissingKeys(vec![LAYOUT_KEY.to_string()])),
        };

        let backup_archive =
            raw.sync_backup.then(|| raw.backup_dir.join(format!("{}-backup.tar.gz", device)));

        Ok(Settings {
            tunnel: TunnelConfig {
                private_key: raw.private_key,
                peer_public_key: raw.peer_public_key,
                peer_endpoint: raw.peer_endpoint,
                local_address,
                dns: raw.dns,
                preshared_key: raw.preshared_key,
            },
            target,
            sync_interval_secs: raw.sync_interval_secs,
            source_dir: raw.source_handshake_path,
            descriptor_path: raw.wg_config_path,
            backup_archive,
            status_hold_secs: raw.status_hold_secs,
        })
    }
}

/// Loads the raw configuration table from a TOML file.
pub fn load_table(path: &Path) -> Result<toml::Table> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
    let table: toml::Table = toml::from_str(&content)?;
    Ok(table)
}

/// Returns the required keys absent from `table`, in declaration order.
///
/// A key counts as present under its legacy alias too. The remote layout is
/// satisfied by either `remote_base_dir` or the legacy `handshake_dir`.
pub fn missing_keys(table: &toml::Table) -> Vec<String> {
    let present = |key: &str| {
        table.contains_key(key)
            || KEY_ALIASES.iter().any(|(canonical, alias)| *canonical == key && table.contains_key(*alias))
    };

    let mut missing: Vec<String> =
        REQUIRED_KEYS.into_iter().filter(|&key| !present(key)).map(String::from).collect();

    if !present(LAYOUT_KEY) && !present(LEGACY_LAYOUT_KEY) {
        missing.push(LAYOUT_KEY.to_string());
    }
    missing
}

/// Runs the full readiness check: required keys, then the transfer backend.
///
/// `has_program` reports whether an executable is installed; production
/// callers pass [`program_on_path`].
pub fn validate<F>(table: &toml::Table, has_program: F) -> Result<Settings>
where
    F: Fn(&str) -> bool,
{
    let settings = Settings::from_table(table)?;
    if !has_program(TRANSFER_PROGRAM) {
        return Err(Error::BackendMissing { program: TRANSFER_PROGRAM.to_string() });
    }
    Ok(settings)
}

/// Returns true if `program` resolves to an executable on `PATH`.
pub fn program_on_path(program: &str) -> bool {
    which::which(program).is_ok()
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
