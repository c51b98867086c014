// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use clap::CommandFactory;
use yare::parameterized;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("wgsync").chain(args.iter().copied())).unwrap()
}

#[test]
fn verify_cli() {
    Cli::command().debug_assert();
}

#[parameterized(
    check = { &["check"], Command::Check { output: OutputFormat::Text } },
    check_json = { &["check", "-o", "json"], Command::Check { output: OutputFormat::Json } },
    render = { &["render"], Command::Render },
    once = { &["once"], Command::Once },
    down = { &["down"], Command::Down },
    status = { &["status"], Command::Status { output: OutputFormat::Text } },
    status_json = { &["status", "--output", "json"], Command::Status { output: OutputFormat::Json } },
    sync = { &["sync"], Command::Sync },
    stop = { &["stop"], Command::Stop },
)]
fn parses_subcommands(args: &[&str], expected: Command) {
    assert_eq!(parse(args).command, expected);
}

#[test]
fn global_flags_after_subcommand() {
    let cli = parse(&["once", "--config", "/tmp/c.toml", "-v", "--state-dir", "/tmp/s"]);

    assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    assert_eq!(cli.state_dir, Some(PathBuf::from("/tmp/s")));
    assert!(cli.verbose);
}

#[test]
fn subcommand_required() {
    assert!(Cli::try_parse_from(["wgsync"]).is_err());
}

#[test]
fn unknown_output_format_rejected() {
    assert!(Cli::try_parse_from(["wgsync", "status", "-o", "yaml"]).is_err());
}
