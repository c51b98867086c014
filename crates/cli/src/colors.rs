// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal color utilities for help and status output.
//!
//! Respects environment variables:
//! - `NO_COLOR=1`: Disables colors
//! - `COLOR=1`: Forces colors even without TTY

use std::io::IsTerminal;

use wgs_core::ConnectionState;

use crate::env;

/// ANSI 256-color codes.
pub mod codes {
    /// Section headers: pastel cyan/steel blue
    pub const HEADER: u8 = 74;
    /// Commands/literals: light grey
    pub const LITERAL: u8 = 250;
    /// Default values/context: medium grey
    pub const CONTEXT: u8 = 245;
    /// Healthy tunnel: soft green
    pub const GOOD: u8 = 114;
    /// Failed tunnel: soft red
    pub const BAD: u8 = 167;
}

/// Check if colors should be enabled based on TTY and environment variables.
pub fn should_colorize() -> bool {
    if env::no_color() {
        return false;
    }
    if env::force_color() {
        return true;
    }
    std::io::stdout().is_terminal()
}

fn paint(code: u8, text: &str) -> String {
    if should_colorize() {
        format!("\x1b[38;5;{code}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

/// Apply header color (section titles) to text.
pub fn header(text: &str) -> String {
    paint(codes::HEADER, text)
}

/// Apply context color (default values, hints) to text.
pub fn context(text: &str) -> String {
    paint(codes::CONTEXT, text)
}

/// Color a connection state by health.
pub fn state(state: ConnectionState) -> String {
    match state {
        ConnectionState::Up => paint(codes::GOOD, state.as_str()),
        ConnectionState::Error | ConnectionState::Failed | ConnectionState::BackendMissing => {
            paint(codes::BAD, state.as_str())
        }
        _ => paint(codes::LITERAL, state.as_str()),
    }
}

/// Generate clap Styles for help output.
pub fn styles() -> clap::builder::styling::Styles {
    use anstyle::{Ansi256Color, Color, Style};
    use clap::builder::styling::Styles;

    if !should_colorize() {
        return Styles::plain();
    }

    let fg = |code: u8| Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(code))));
    Styles::styled()
        .header(fg(codes::HEADER))
        .usage(fg(codes::HEADER))
        .literal(fg(codes::LITERAL))
        .placeholder(fg(codes::CONTEXT))
        .valid(fg(codes::CONTEXT))
}

#[cfg(test)]
#[path = "colors_tests.rs"]
mod tests;
