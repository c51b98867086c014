// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    missing_keys = { Error::MissingKeys(vec!["private_key".into(), "remote_user".into()]), "private_key, remote_user" },
    backend_missing = { Error::BackendMissing { program: "rsync".into() }, "rsync is not installed" },
    invalid_address = { Error::InvalidAddress("10.8".into()), "10.8" },
    provision = { Error::Provision("permission denied".into()), "provisioning failed" },
)]
fn error_display_contains(err: Error, expected: &str) {
    assert!(err.to_string().contains(expected));
}

#[test]
fn error_from_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn error_from_toml() {
    let toml_err = toml::from_str::<toml::Table>("= nope").unwrap_err();
    let err: Error = toml_err.into();
    assert!(matches!(err, Error::Toml(_)));
}
