// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tunnel descriptor rendering.
//!
//! The descriptor is the INI-style file handed to the tunnel backend:
//!
//! ```text
//! [Interface]
//! PrivateKey = <key>
//! Address = <cidr>
//! DNS = <ip>
//! [Peer]
//! PublicKey = <key>
//! Endpoint = <host:port>
//! AllowedIPs = <gateway>/32
//! PersistentKeepalive = 25
//! PresharedKey = <key>
//! ```
//!
//! It is rewritten before every connect attempt with owner-only permissions.

use std::fmt;
use std::fs;
use std::io::Write;
use std::net::Ipv4Addr;
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::Path;

use crate::error::{Error, Result};

/// Keepalive interval written to every descriptor, in seconds.
pub const PERSISTENT_KEEPALIVE_SECS: u32 = 25;

/// Descriptor file mode: owner read/write only.
const DESCRIPTOR_MODE: u32 = 0o600;

const REDACTED: &str = "(redacted)";

/// The local tunnel address as configured, e.g. `10.8.0.5/24`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalAddress {
    text: String,
    ip: Ipv4Addr,
    prefix: Option<u8>,
}

impl LocalAddress {
    /// Parses an IPv4 address with an optional `/prefix`.
    pub fn parse(s: &str) -> Result<Self> {
        let text = s.trim();
        let invalid = || Error::InvalidAddress(s.to_string());

        let (ip_part, prefix_part) = match text.split_once('/') {
            Some((ip, prefix)) => (ip, Some(prefix)),
            None => (text, None),
        };
        let ip: Ipv4Addr = ip_part.parse().map_err(|_| invalid())?;
        let prefix = prefix_part
            .map(|p| p.parse::<u8>().ok().filter(|n| *n <= 32).ok_or_else(invalid))
            .transpose()?;

        Ok(LocalAddress { text: text.to_string(), ip, prefix })
    }

    pub fn ip(&self) -> Ipv4Addr {
        self.ip
    }

    pub fn prefix(&self) -> Option<u8> {
        self.prefix
    }

    /// The remote peer's address inside the tunnel: the first three octets
    /// of the local address followed by `.1`.
    pub fn gateway(&self) -> Ipv4Addr {
        let [a, b, c, _] = self.ip.octets();
        Ipv4Addr::new(a, b, c, 1)
    }
}

impl fmt::Display for LocalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Everything needed to render the tunnel descriptor.
#[derive(Debug, Clone)]
pub struct TunnelConfig {
    pub private_key: String,
    pub peer_public_key: String,
    pub peer_endpoint: String,
    pub local_address: LocalAddress,
    pub dns: String,
    pub preshared_key: Option<String>,
}

impl TunnelConfig {
    /// Address of the remote host inside the tunnel.
    pub fn gateway(&self) -> Ipv4Addr {
        self.local_address.gateway()
    }

    /// The only route sent through the tunnel: the gateway itself.
    pub fn allowed_ips(&self) -> String {
        format!("{}/32", self.gateway())
    }

    /// Renders the descriptor contents.
    pub fn render(&self) -> String {
        self.render_with(|key| key)
    }

    /// Renders the descriptor with all key material replaced, for display.
    pub fn render_redacted(&self) -> String {
        self.render_with(|_| REDACTED)
    }

    fn render_with<'a>(&'a self, key: impl Fn(&'a str) -> &'a str) -> String {
        let mut out = String::new();
        out.push_str("[Interface]\n");
        out.push_str(&format!("PrivateKey = {}\n", key(self.private_key.as_str())));
        out.push_str(&format!("Address = {}\n", self.local_address));
        out.push_str(&format!("DNS = {}\n", self.dns));
        out.push_str("[Peer]\n");
        out.push_str(&format!("PublicKey = {}\n", self.peer_public_key));
        out.push_str(&format!("Endpoint = {}\n", self.peer_endpoint));
        out.push_str(&format!("AllowedIPs = {}\n", self.allowed_ips()));
        out.push_str(&format!("PersistentKeepalive = {}\n", PERSISTENT_KEEPALIVE_SECS));
        if let Some(psk) = &self.preshared_key {
            out.push_str(&format!("PresharedKey = {}\n", key(psk.as_str())));
        }
        out
    }
}

/// Writes the descriptor to `path`, replacing any previous contents.
///
/// The file is created with mode `0600`, and the mode is reapplied in case
/// the file already existed with wider permissions.
pub fn write_descriptor(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(DESCRIPTOR_MODE)
        .open(path)?;
    file.set_permissions(fs::Permissions::from_mode(DESCRIPTOR_MODE))?;
    file.write_all(contents.as_bytes())?;
    file.flush()
}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
