// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]

use super::*;
use std::path::PathBuf;
use yare::parameterized;

const MISSING_PROGRAM: &str = "wgsync-test-no-such-program";

fn host() -> RemoteHost {
    RemoteHost::new("pi", Ipv4Addr::new(10, 8, 0, 1))
}

#[test]
fn remote_host_display() {
    assert_eq!(host().to_string(), "pi@10.8.0.1");
}

#[test]
fn classify_dns_failure() {
    let err = classify_up_failure(
        "wg-quick".into(),
        "exit status: 1".into(),
        "Name or service not known: `vpn.example.com:51820'\nNo address associated with hostname".into(),
    );
    assert!(matches!(err, BackendError::DnsResolution(_)));
}

#[test]
fn classify_other_failure() {
    let err = classify_up_failure(
        "wg-quick".into(),
        "exit status: 1".into(),
        "RTNETLINK answers: Operation not permitted".into(),
    );
    match err {
        BackendError::Failed { program, stderr, .. } => {
            assert_eq!(program, "wg-quick");
            assert!(stderr.contains("RTNETLINK"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn ssh_args_are_non_interactive() {
    let args = ssh_args(&host(), "mkdir -p '/srv/loot'");
    assert_eq!(
        args,
        vec![
            "-o",
            "StrictHostKeyChecking=no",
            "-o",
            "BatchMode=yes",
            "-o",
            "UserKnownHostsFile=/dev/null",
            "pi@10.8.0.1",
            "mkdir -p '/srv/loot'",
        ]
    );
}

#[test]
fn rsync_args_layout() {
    let args = rsync_args(&PathBuf::from("/home/pi/handshakes/"), &host(), "/srv/loot/pwn01/handshakes");
    let args: Vec<String> = args.into_iter().map(|a| a.to_string_lossy().into_owned()).collect();
    assert_eq!(&args[..3], &["-avz", "--stats", "-e"]);
    assert_eq!(
        args[3],
        "ssh -o StrictHostKeyChecking=no -o BatchMode=yes -o UserKnownHostsFile=/dev/null"
    );
    assert_eq!(args[4], "/home/pi/handshakes/");
    assert_eq!(args[5], "pi@10.8.0.1:/srv/loot/pwn01/handshakes");
}

#[parameterized(
    plain = { "/srv/loot", "'/srv/loot'" },
    spaces = { "/srv/my loot", "'/srv/my loot'" },
    quote = { "/srv/it's", r"'/srv/it'\''s'" },
)]
fn shell_quote_cases(input: &str, expected: &str) {
    assert_eq!(shell_quote(input), expected);
}

#[test]
fn missing_tunnel_program_is_reported() {
    let mut backend = WgQuick::with_program(MISSING_PROGRAM);
    let err = backend.bring_up(Path::new("/tmp/wg0.conf")).unwrap_err();
    assert!(matches!(err, BackendError::Missing { program } if program == MISSING_PROGRAM));

    let err = backend.bring_down(Path::new("/tmp/wg0.conf")).unwrap_err();
    assert!(matches!(err, BackendError::Missing { .. }));
}

#[test]
fn missing_transfer_program_is_reported() {
    let mut backend = Rsync::with_program(MISSING_PROGRAM);
    let err = backend.transfer(Path::new("/tmp"), &host(), "/srv").unwrap_err();
    assert!(matches!(err, BackendError::Missing { .. }));
}

#[test]
fn successful_program_returns_ok() {
    let mut backend = WgQuick::with_program("true");
    assert!(backend.bring_up(Path::new("/tmp/wg0.conf")).is_ok());
}

#[test]
fn failing_program_is_a_plain_failure() {
    let mut backend = WgQuick::with_program("false");
    let err = backend.bring_up(Path::new("/tmp/wg0.conf")).unwrap_err();
    assert!(matches!(err, BackendError::Failed { .. }));
}
