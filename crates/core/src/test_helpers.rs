// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fakes for controller tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::backend::{BackendError, FileTransfer, RemoteHost, RemoteShell, TunnelBackend};
use crate::clock::Sleeper;
use crate::status::StatusReporter;

/// Scripted result of a fake backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Dns,
    Fail(&'static str),
    Missing,
}

impl Outcome {
    fn into_result(self, program: &str) -> Result<(), BackendError> {
        match self {
            Outcome::Ok => Ok(()),
            Outcome::Dns => Err(BackendError::DnsResolution(
                "No address associated with hostname".to_string(),
            )),
            Outcome::Fail(stderr) => Err(BackendError::Failed {
                program: program.to_string(),
                status: "exit status: 1".to_string(),
                stderr: stderr.to_string(),
            }),
            Outcome::Missing => Err(BackendError::Missing { program: program.to_string() }),
        }
    }
}

/// Calls observed by [`FakeTunnel`].
#[derive(Debug, Default)]
pub struct TunnelLog {
    pub downs: usize,
    pub ups: usize,
    /// Descriptor contents as seen at each bring-up.
    pub descriptors: Vec<String>,
}

/// Tunnel backend that replays a script of bring-up outcomes.
pub struct FakeTunnel {
    script: VecDeque<Outcome>,
    fallback: Outcome,
    down: Outcome,
    log: Arc<Mutex<TunnelLog>>,
}

impl FakeTunnel {
    /// Every bring-up returns `outcome`.
    pub fn always(outcome: Outcome) -> Self {
        Self::scripted(Vec::new(), outcome)
    }

    /// Bring-ups follow `script`, then `fallback` forever.
    pub fn scripted(script: Vec<Outcome>, fallback: Outcome) -> Self {
        FakeTunnel {
            script: script.into(),
            fallback,
            down: Outcome::Ok,
            log: Arc::new(Mutex::new(TunnelLog::default())),
        }
    }

    pub fn with_down(mut self, outcome: Outcome) -> Self {
        self.down = outcome;
        self
    }

    pub fn log(&self) -> Arc<Mutex<TunnelLog>> {
        Arc::clone(&self.log)
    }
}

impl TunnelBackend for FakeTunnel {
    fn bring_down(&mut self, _descriptor: &Path) -> Result<(), BackendError> {
        self.log.lock().unwrap().downs += 1;
        self.down.clone().into_result("wg-quick")
    }

    fn bring_up(&mut self, descriptor: &Path) -> Result<(), BackendError> {
        let contents = std::fs::read_to_string(descriptor).unwrap_or_default();
        {
            let mut log = self.log.lock().unwrap();
            log.ups += 1;
            log.descriptors.push(contents);
        }
        let outcome = self.script.pop_front().unwrap_or_else(|| self.fallback.clone());
        outcome.into_result("wg-quick")
    }
}

/// Remote shell that records commands and returns a fixed outcome.
pub struct FakeShell {
    outcome: Outcome,
    commands: Arc<Mutex<Vec<(String, String)>>>,
}

impl FakeShell {
    pub fn new(outcome: Outcome) -> Self {
        FakeShell { outcome, commands: Arc::new(Mutex::new(Vec::new())) }
    }

    /// `(host, command)` pairs in call order.
    pub fn commands(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        Arc::clone(&self.commands)
    }
}

impl RemoteShell for FakeShell {
    fn run(&mut self, host: &RemoteHost, command: &str) -> Result<(), BackendError> {
        self.commands.lock().unwrap().push((host.to_string(), command.to_string()));
        self.outcome.clone().into_result("ssh")
    }
}

/// A transfer call observed by [`FakeTransfer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCall {
    pub source: PathBuf,
    pub destination: String,
}

/// File transfer that replays scripted stdout or failures.
pub struct FakeTransfer {
    script: VecDeque<Result<String, &'static str>>,
    calls: Arc<Mutex<Vec<TransferCall>>>,
}

impl FakeTransfer {
    /// Each call consumes the next entry; `Err` entries become backend failures.
    /// Once the script runs out every call succeeds with empty output.
    pub fn scripted(script: Vec<Result<&str, &'static str>>) -> Self {
        FakeTransfer {
            script: script.into_iter().map(|r| r.map(String::from)).collect(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<TransferCall>>> {
        Arc::clone(&self.calls)
    }
}

impl FileTransfer for FakeTransfer {
    fn transfer(
        &mut self,
        source: &Path,
        _host: &RemoteHost,
        destination: &str,
    ) -> Result<String, BackendError> {
        self.calls.lock().unwrap().push(TransferCall {
            source: source.to_path_buf(),
            destination: destination.to_string(),
        });
        match self.script.pop_front() {
            Some(Ok(stdout)) => Ok(stdout),
            Some(Err(stderr)) => Err(BackendError::Failed {
                program: "rsync".to_string(),
                status: "exit status: 23".to_string(),
                stderr: stderr.to_string(),
            }),
            None => Ok(String::new()),
        }
    }
}

/// Sleeper that records requested delays instead of sleeping.
#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Arc<Mutex<Vec<Duration>>> {
        Arc::clone(&self.sleeps)
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// Reporter that records every published label.
#[derive(Default)]
pub struct RecordingReporter {
    labels: Arc<Mutex<Vec<String>>>,
}

impl RecordingReporter {
    pub fn labels(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.labels)
    }
}

impl StatusReporter for RecordingReporter {
    fn set(&mut self, label: &str) {
        self.labels.lock().unwrap().push(label.to_string());
    }
}
