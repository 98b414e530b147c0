// src/engine/mod.rs

//! Retry engine for one supervised command.
//!
//! The pure state machine lives in [`core`] with its transitions in
//! [`event_handlers`]; the async shell that probes, executes and sleeps is
//! [`runtime`].
//!
//! ```text
//! Probing --unreachable--> Probing
//! Probing --reachable----> Executing --result--> Classifying --clean-------> Succeeded
//!                                                            \--interrupted--> Retrying --delay--> Probing
//! Probing / Executing --connection dropped--> RecoverableError --delay--> Probing
//! ```

use std::time::Duration;

use crate::backoff::RetryState;
use crate::exec::{AttemptError, AttemptResult};
use crate::probe::ProbeOutcome;

/// Where the runner currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Probing,
    Executing,
    Classifying,
    Retrying,
    RecoverableError,
    Succeeded,
}

/// Events flowing from the IO shell into the core.
#[derive(Debug, Clone)]
pub enum RunnerEvent {
    /// The run begins.
    Started,
    ProbeFinished(ProbeOutcome),
    ExecutionFinished(AttemptResult),
    ExecutionFailed(AttemptError),
    /// A backoff sleep has completed.
    DelayElapsed,
}

/// Why the core asked for a sleep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryReason {
    /// The classifier found an interruption marker.
    Interrupted,
    /// The connection went away; the attempt counter was reset.
    ConnectionDropped(String),
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Succeeded,
    /// Ctrl-C (or another cancellation signal) arrived first.
    Cancelled,
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Executions of the command that were started.
    pub attempts: u32,
    /// Connectivity checks performed.
    pub probes: u32,
    /// Every backoff sleep requested, in order.
    pub delays: Vec<Duration>,
    pub retry_state: RetryState,
}

pub mod core;
pub mod event_handlers;
pub mod runtime;
pub mod sleeper;

pub use self::core::RetryCore;
pub use event_handlers::{CoreCommand, CoreStep};
pub use runtime::RetryingRunner;
pub use sleeper::{Sleeper, TokioSleeper};
