// src/exec/mod.rs

//! Process execution layer.
//!
//! Runs the supervised command with `tokio::process::Command` and hands the
//! captured output back to the runner. Nothing here decides whether a run
//! succeeded; that is the classifier's job.
//!
//! - [`backend`] provides the `CommandExecutor` trait and the production
//!   `ProcessExecutor`, which tests replace with a scripted fake.
//! - [`process`] spawns one child and collects its output.

use std::fmt;

pub mod backend;
pub mod process;

pub use backend::{CommandExecutor, ProcessExecutor};

/// Everything captured from one invocation.
///
/// `exit_code` is `None` when the child was terminated by a signal. It is
/// kept for display only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttemptResult {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// A recoverable failure while an attempt was in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptError {
    /// The connection or the child's output stream went away mid-run.
    ConnectionDropped(String),
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptError::ConnectionDropped(reason) => write!(f, "{reason}"),
        }
    }
}

/// Outcome of handing a command to an executor.
///
/// Fatal problems (the program cannot be started at all) are reported
/// through the outer `Result` instead.
pub type AttemptOutcome = std::result::Result<AttemptResult, AttemptError>;
