// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for wgs-core operations.

use thiserror::Error;

/// All possible errors that can occur in wgs-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("missing required config options: {}", .0.join(", "))]
    MissingKeys(Vec<String>),

    #[error("{program} is not installed\n  hint: install it or make sure it is on PATH")]
    BackendMissing { program: String },

    #[error("invalid local address '{0}'\n  hint: expected an IPv4 address such as 10.8.0.5/24")]
    InvalidAddress(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("provisioning failed: {0}")]
    Provision(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A specialized Result type for wgs-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
