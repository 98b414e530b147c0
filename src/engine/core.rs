// src/engine/core.rs

//! Pure core state machine.
//!
//! `RetryCore` consumes [`RunnerEvent`]s and answers with the next thing the
//! IO shell should do. It owns the retry counters and has no Tokio types,
//! no network and no processes, so every transition can be tested directly.

use std::time::Duration;

use tracing::debug;

use crate::backoff::{BackoffSchedule, RetryState};
use crate::classify::OutputClassifier;
use crate::engine::event_handlers::{
    handle_delay_elapsed, handle_execution_failed, handle_execution_finished, handle_probe,
    handle_start, CoreCommand, CoreStep,
};
use crate::engine::{Phase, RunOutcome, RunReport, RunnerEvent};

#[derive(Debug)]
pub struct RetryCore {
    schedule: BackoffSchedule,
    classifier: OutputClassifier,
    state: RetryState,
    phase: Phase,
    history: Vec<Phase>,
    executions: u32,
    probes: u32,
    delays: Vec<Duration>,
}

impl RetryCore {
    pub fn new(schedule: BackoffSchedule) -> Self {
        let state = schedule.initial_state();
        Self {
            schedule,
            classifier: OutputClassifier,
            state,
            phase: Phase::Idle,
            history: vec![Phase::Idle],
            executions: 0,
            probes: 0,
            delays: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Every phase entered so far, starting with `Idle`.
    pub fn history(&self) -> &[Phase] {
        &self.history
    }

    pub fn retry_state(&self) -> RetryState {
        self.state
    }

    pub fn executions(&self) -> u32 {
        self.executions
    }

    /// Handle a single event, updating state and returning the next command.
    pub fn step(&mut self, event: RunnerEvent) -> CoreStep {
        let step = match event {
            RunnerEvent::Started => handle_start(),
            RunnerEvent::ProbeFinished(outcome) => {
                self.probes += 1;
                handle_probe(&mut self.state, &self.schedule, outcome, self.executions)
            }
            RunnerEvent::ExecutionFinished(result) => {
                self.enter(Phase::Classifying);
                handle_execution_finished(
                    &mut self.state,
                    &self.schedule,
                    &self.classifier,
                    &result,
                )
            }
            RunnerEvent::ExecutionFailed(error) => {
                handle_execution_failed(&mut self.state, &self.schedule, error)
            }
            RunnerEvent::DelayElapsed => handle_delay_elapsed(),
        };

        match &step.command {
            CoreCommand::Execute { .. } => self.executions += 1,
            CoreCommand::Sleep { delay, .. } => self.delays.push(*delay),
            CoreCommand::Probe | CoreCommand::Finish => {}
        }

        debug!(command = ?step.command, "core command");
        self.enter(step.phase);
        step
    }

    fn enter(&mut self, phase: Phase) {
        debug!(from = ?self.phase, to = ?phase, "core transition");
        self.phase = phase;
        self.history.push(phase);
    }

    pub fn report(&self, outcome: RunOutcome) -> RunReport {
        RunReport {
            outcome,
            attempts: self.executions,
            probes: self.probes,
            delays: self.delays.clone(),
            retry_state: self.state,
        }
    }
}
