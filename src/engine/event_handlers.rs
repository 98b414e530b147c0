// src/engine/event_handlers.rs

//! Transition logic for the core runtime.

use std::time::Duration;

use tracing::{debug, info};

use crate::backoff::{BackoffSchedule, RetryState};
use crate::classify::OutputClassifier;
use crate::exec::{AttemptError, AttemptResult};
use crate::probe::ProbeOutcome;

use super::{Phase, RetryReason};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Check connectivity.
    Probe,
    /// Run the command. `restart` is false only for the very first attempt.
    Execute { restart: bool },
    /// Wait before probing again.
    Sleep { delay: Duration, reason: RetryReason },
    /// The run is over.
    Finish,
}

/// Decision returned by the core after handling a single `RunnerEvent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    pub phase: Phase,
    pub command: CoreCommand,
}

impl CoreStep {
    fn new(phase: Phase, command: CoreCommand) -> Self {
        Self { phase, command }
    }
}

pub fn handle_start() -> CoreStep {
    CoreStep::new(Phase::Probing, CoreCommand::Probe)
}

/// Unreachable loops straight back to probing without touching the counters.
pub fn handle_probe(
    state: &mut RetryState,
    schedule: &BackoffSchedule,
    outcome: ProbeOutcome,
    executions: u32,
) -> CoreStep {
    match outcome {
        ProbeOutcome::Reachable => CoreStep::new(
            Phase::Executing,
            CoreCommand::Execute {
                restart: executions > 0,
            },
        ),
        ProbeOutcome::Unreachable => {
            debug!(attempt_count = state.attempt_count, "no connectivity; probing again");
            CoreStep::new(Phase::Probing, CoreCommand::Probe)
        }
        ProbeOutcome::Dropped(reason) => recover(state, schedule, reason),
    }
}

pub fn handle_execution_finished(
    state: &mut RetryState,
    schedule: &BackoffSchedule,
    classifier: &OutputClassifier,
    result: &AttemptResult,
) -> CoreStep {
    debug!(exit_code = ?result.exit_code, "classifying attempt output");

    if !classifier.is_interrupted(result) {
        info!(attempt_count = state.attempt_count, "command completed");
        return CoreStep::new(Phase::Succeeded, CoreCommand::Finish);
    }

    let delay = state.advance(schedule);
    info!(
        attempt_count = state.attempt_count,
        delay_secs = delay.as_secs(),
        "command interrupted; scheduling retry"
    );
    CoreStep::new(
        Phase::Retrying,
        CoreCommand::Sleep {
            delay,
            reason: RetryReason::Interrupted,
        },
    )
}

pub fn handle_execution_failed(
    state: &mut RetryState,
    schedule: &BackoffSchedule,
    error: AttemptError,
) -> CoreStep {
    match error {
        AttemptError::ConnectionDropped(reason) => recover(state, schedule, reason),
    }
}

pub fn handle_delay_elapsed() -> CoreStep {
    CoreStep::new(Phase::Probing, CoreCommand::Probe)
}

/// Connection drops restart the attempt counter; the drop counts as attempt 1.
fn recover(state: &mut RetryState, schedule: &BackoffSchedule, reason: String) -> CoreStep {
    let delay = state.restart_count(schedule);
    info!(
        attempt_count = state.attempt_count,
        delay_secs = delay.as_secs(),
        %reason,
        "connection dropped; attempt counter restarted"
    );
    CoreStep::new(
        Phase::RecoverableError,
        CoreCommand::Sleep {
            delay,
            reason: RetryReason::ConnectionDropped(reason),
        },
    )
}
