// src/engine/runtime.rs

use std::fmt;
use std::future::Future;

use tracing::{debug, info};

use crate::command::Command;
use crate::console::{Console, Tone};
use crate::errors::Result;
use crate::exec::CommandExecutor;
use crate::probe::{ConnectivityProbe, ProbeOutcome};

use super::core::RetryCore;
use super::{CoreCommand, RetryReason, RunOutcome, RunReport, RunnerEvent};

/// Drives the retry core by probing, executing and sleeping.
///
/// This is the IO shell around [`RetryCore`]: every decision is made by the
/// core, this type only performs what it is told and reports back. Attempts
/// run strictly one after another.
pub struct RetryingRunner<P, E, S> {
    core: RetryCore,
    probe: P,
    executor: E,
    sleeper: S,
    console: Console,
}

impl<P, E, S> fmt::Debug for RetryingRunner<P, E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryingRunner")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<P, E, S> RetryingRunner<P, E, S>
where
    P: ConnectivityProbe,
    E: CommandExecutor,
    S: super::Sleeper,
{
    pub fn new(core: RetryCore, probe: P, executor: E, sleeper: S, console: Console) -> Self {
        Self {
            core,
            probe,
            executor,
            sleeper,
            console,
        }
    }

    /// Supervise `command` until it completes cleanly or `cancel` resolves.
    ///
    /// Cancellation is checked at every await point. An attempt already in
    /// flight is abandoned, not killed.
    pub async fn run<C>(&mut self, command: &Command, cancel: C) -> Result<RunReport>
    where
        C: Future<Output = ()>,
    {
        info!(cmd = %command, "runner started");

        let outcome = tokio::select! {
            res = self.drive(command) => {
                res?;
                RunOutcome::Succeeded
            }
            _ = cancel => {
                info!("cancellation requested; leaving retry loop");
                RunOutcome::Cancelled
            }
        };

        let report = self.core.report(outcome);
        info!(
            outcome = ?report.outcome,
            phase = ?self.core.phase(),
            attempts = report.attempts,
            "runner finished"
        );
        Ok(report)
    }

    async fn drive(&mut self, command: &Command) -> Result<()> {
        let mut event = RunnerEvent::Started;

        loop {
            let step = self.core.step(event);

            event = match step.command {
                CoreCommand::Probe => RunnerEvent::ProbeFinished(self.probe_once().await?),
                CoreCommand::Execute { restart } => {
                    let notice = if restart {
                        "\nRestarting process..."
                    } else {
                        "\nStarting process..."
                    };
                    self.console.print(notice, Tone::Notice);

                    match self.executor.execute(command).await? {
                        Ok(result) => {
                            self.console
                                .print_attempt_output(&result.stdout, &result.stderr);
                            RunnerEvent::ExecutionFinished(result)
                        }
                        Err(error) => RunnerEvent::ExecutionFailed(error),
                    }
                }
                CoreCommand::Sleep { delay, reason } => {
                    match &reason {
                        RetryReason::Interrupted => {
                            self.console.print("Process interrupted.\n", Tone::Error);
                        }
                        RetryReason::ConnectionDropped(why) => {
                            self.console.print_timestamped_problem(why);
                        }
                    }
                    debug!(delay_secs = delay.as_secs(), ?reason, "sleeping before next attempt");
                    self.sleeper.sleep(delay).await;
                    RunnerEvent::DelayElapsed
                }
                CoreCommand::Finish => return Ok(()),
            };
        }
    }

    async fn probe_once(&mut self) -> Result<ProbeOutcome> {
        let outcome = self.probe.check().await?;
        debug!(reachable = outcome.is_reachable(), ?outcome, "probe finished");
        Ok(outcome)
    }
}
