// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod common;
use common::*;

#[test]
fn check_lists_every_missing_key() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp, "private_key = \"k\"\n");

    wgsync(&temp)
        .arg("check")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "error: missing required config options: peer_public_key, peer_endpoint, \
             local_address, remote_user, remote_base_dir",
        ));
}

#[test]
fn check_missing_file_fails() {
    let temp = TempDir::new().unwrap();

    wgsync(&temp)
        .args(["check", "-c"])
        .arg(temp.path().join("absent.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn check_reads_config_from_env() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp, "dns = \"9.9.9.9\"\n");

    wgsync(&temp)
        .env("WGSYNC_CONFIG", &config)
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required config options: private_key"));
}

#[test]
fn render_redacts_keys() {
    let temp = TempDir::new().unwrap();
    let config = full_config(&temp);

    wgsync(&temp)
        .arg("render")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("PrivateKey = (redacted)"))
        .stdout(predicate::str::contains("AllowedIPs = 10.8.0.1/32"))
        .stdout(predicate::str::contains("cHJpdmF0ZQ==").not());

    assert!(!temp.path().join("wg0.conf").exists());
}

#[test]
fn render_rejects_invalid_address() {
    let temp = TempDir::new().unwrap();
    let config = full_config(&temp);
    let contents = std::fs::read_to_string(&config).unwrap().replace("10.8.0.5/24", "not-an-ip");
    std::fs::write(&config, contents).unwrap();

    wgsync(&temp)
        .args(["render", "-c"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid local address 'not-an-ip'"));
}

#[test]
fn down_without_descriptor_is_a_no_op() {
    let temp = TempDir::new().unwrap();
    let config = full_config(&temp);

    wgsync(&temp)
        .args(["down", "-c"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to bring down"));
}
