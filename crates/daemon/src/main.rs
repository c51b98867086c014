// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! wgsyncd - The wgsync daemon.
//!
//! Polls for network connectivity and drives the tunnel and sync agent on a
//! single thread. Listens on a Unix socket for IPC from `wgsync` CLI
//! processes.
//!
//! Usage:
//!   wgsyncd [--config <path>] [--state-dir <path>] [--poll-secs <n>]

use std::fs;
use std::io::{ErrorKind, Write};
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use wgs_core::config::DEFAULT_CONFIG_PATH;
use wgs_core::{
    Agent, Backends, ClockSource, ConnectivityProbe, FileReporter, RouteTableProbe, SystemClock,
};

mod env;
mod ipc;
#[cfg(test)]
mod test_support;

/// Socket filename within daemon directory.
const SOCKET_NAME: &str = "daemon.sock";
/// PID filename within daemon directory.
const PID_NAME: &str = "daemon.pid";
/// Lock filename for single instance guarantee.
const LOCK_NAME: &str = "daemon.lock";
/// Status label mirror for external displays.
const STATUS_NAME: &str = "status";

/// Default seconds between connectivity probes.
const DEFAULT_POLL_SECS: u64 = 30;
/// Idle wait between socket accept attempts.
const ACCEPT_INTERVAL: Duration = Duration::from_millis(200);

/// Command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Options {
    config: PathBuf,
    state_dir: PathBuf,
    poll_secs: u64,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let options = parse_options(&args);
    let state_dir = &options.state_dir;

    if let Err(e) = fs::create_dir_all(state_dir) {
        eprintln!("failed to create {}: {}", state_dir.display(), e);
        std::process::exit(1);
    }

    // Set up logging
    setup_logging(&state_dir.join("daemon.log"));

    tracing::info!(
        "wgsyncd starting, state_dir={}, config={}",
        state_dir.display(),
        options.config.display()
    );

    // Acquire file lock for single instance
    let lock_file = match acquire_lock(&state_dir.join(LOCK_NAME)) {
        Ok(f) => f,
        Err(e) => {
            tracing::error!("failed to acquire lock: {}", e);
            std::process::exit(1);
        }
    };

    let pid_path = state_dir.join(PID_NAME);
    if let Err(e) = write_pid_file(&pid_path) {
        tracing::error!("failed to write PID file: {}", e);
        std::process::exit(1);
    }

    let socket_path = state_dir.join(SOCKET_NAME);
    // Remove stale socket if it exists
    let _ = fs::remove_file(&socket_path);

    let listener = match UnixListener::bind(&socket_path).and_then(|l| {
        l.set_nonblocking(true)?;
        Ok(l)
    }) {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("failed to bind socket: {}", e);
            cleanup(&pid_path, &socket_path);
            std::process::exit(1);
        }
    };

    let terminate = Arc::new(AtomicBool::new(false));
    for signal in [signal_hook::consts::SIGTERM, signal_hook::consts::SIGINT] {
        if let Err(e) = signal_hook::flag::register(signal, Arc::clone(&terminate)) {
            tracing::warn!("failed to register signal handler: {}", e);
        }
    }

    let mut agent = Agent::load(
        &options.config,
        Backends::system(),
        Box::new(FileReporter::new(state_dir.join(STATUS_NAME))),
    );

    tracing::info!("listening on {}", socket_path.display());

    // Signal readiness to parent process
    println!("READY");
    let _ = std::io::stdout().flush();

    run(
        &listener,
        &mut agent,
        &RouteTableProbe::new(),
        &SystemClock,
        Duration::from_secs(options.poll_secs),
        &terminate,
    );

    agent.shutdown();
    cleanup(&pid_path, &socket_path);
    drop(lock_file);
    tracing::info!("wgsyncd stopped");
}

/// Serves IPC and polls connectivity until asked to stop.
fn run(
    listener: &UnixListener,
    agent: &mut Agent,
    probe: &dyn ConnectivityProbe,
    clock: &dyn ClockSource,
    poll: Duration,
    terminate: &AtomicBool,
) {
    let start_time = Instant::now();
    let mut last_probe: Option<Instant> = None;
    let mut online = false;

    while !terminate.load(Ordering::Relaxed) {
        match listener.accept() {
            Ok((mut stream, _)) => {
                let _ = stream.set_nonblocking(false);
                let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
                let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
                let uptime = start_time.elapsed().as_secs();
                if ipc::serve(&mut stream, agent, uptime, clock.now_secs()) {
                    tracing::info!("shutdown requested");
                    return;
                }
                continue;
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => {}
            Err(e) => tracing::warn!("failed to accept connection: {}", e),
        }

        let now = clock.now_secs();
        agent.tick(now);

        if last_probe.map_or(true, |at| at.elapsed() >= poll) {
            last_probe = Some(Instant::now());
            let is_online = probe.is_online();
            if is_online != online {
                tracing::info!("connectivity {}", if is_online { "available" } else { "lost" });
                online = is_online;
            }
            if is_online {
                agent.on_connectivity(now);
            }
        }

        std::thread::sleep(ACCEPT_INTERVAL);
    }
    tracing::info!("terminated by signal");
}

fn parse_options(args: &[String]) -> Options {
    let value_of = |flag: &str| {
        args.iter().position(|a| a == flag).and_then(|i| args.get(i + 1)).cloned()
    };

    let poll_secs = match value_of("--poll-secs").map(|v| v.parse::<u64>()) {
        Some(Ok(secs)) if secs > 0 => secs,
        Some(_) => {
            eprintln!("invalid --poll-secs, using {}", DEFAULT_POLL_SECS);
            DEFAULT_POLL_SECS
        }
        None => DEFAULT_POLL_SECS,
    };

    Options {
        config: value_of("--config")
            .map(PathBuf::from)
            .or_else(env::config_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
        state_dir: value_of("--state-dir").map(PathBuf::from).unwrap_or_else(default_state_dir),
        poll_secs,
    }
}

fn default_state_dir() -> PathBuf {
    if let Some(dir) = env::state_dir() {
        return dir;
    }
    if let Some(dir) = env::xdg_state_home() {
        return dir.join("wgsync");
    }
    dirs::home_dir()
        .map(|h| h.join(".local/state/wgsync"))
        .unwrap_or_else(|| PathBuf::from(".local/state/wgsync"))
}

fn setup_logging(log_path: &Path) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Try to open log file, fall back to stderr
    if let Ok(file) = fs::OpenOptions::new().create(true).append(true).open(log_path) {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(file).with_ansi(false).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    }
}

fn acquire_lock(lock_path: &Path) -> std::io::Result<fs::File> {
    use fs2::FileExt;

    let file = fs::OpenOptions::new().create(true).write(true).truncate(true).open(lock_path)?;
    file.try_lock_exclusive()
        .map_err(|_| std::io::Error::other("another daemon instance is already running"))?;
    Ok(file)
}

fn write_pid_file(pid_path: &Path) -> std::io::Result<()> {
    fs::write(pid_path, format!("{}", std::process::id()))
}

fn cleanup(pid_path: &Path, socket_path: &Path) {
    let _ = fs::remove_file(pid_path);
    let _ = fs::remove_file(socket_path);
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
