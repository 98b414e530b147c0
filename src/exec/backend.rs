// src/exec/backend.rs

//! Pluggable executor abstraction.
//!
//! The runner talks to a `CommandExecutor` instead of spawning processes
//! itself, so tests can script attempt results without running apt.

use std::future::Future;
use std::pin::Pin;

use crate::command::Command;
use crate::errors::Result;

use super::process::run_attempt;
use super::AttemptOutcome;

/// Trait abstracting how one attempt of the supervised command is run.
pub trait CommandExecutor: Send {
    /// Run `command` to completion and return what it printed.
    ///
    /// - `Ok(Ok(result))`: the process ran; its exit code is not judged here.
    /// - `Ok(Err(_))`: a recoverable drop while the attempt was in flight.
    /// - `Err(_)`: the command cannot be run at all.
    fn execute<'a>(
        &'a mut self,
        command: &'a Command,
    ) -> Pin<Box<dyn Future<Output = Result<AttemptOutcome>> + Send + 'a>>;
}

/// Real executor used in production: one child process per attempt.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for ProcessExecutor {
    fn execute<'a>(
        &'a mut self,
        command: &'a Command,
    ) -> Pin<Box<dyn Future<Output = Result<AttemptOutcome>> + Send + 'a>> {
        Box::pin(run_attempt(command))
    }
}
