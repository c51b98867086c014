// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use clap::Parser;
use wgsync::Cli;

fn main() {
    let cli = Cli::parse();
    wgsync::init_logging(cli.verbose);
    if let Err(e) = wgsync::run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
