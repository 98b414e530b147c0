use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pi_updater::command::Command;
use pi_updater::engine::Sleeper;
use pi_updater::errors::Result;
use pi_updater::exec::{AttemptOutcome, CommandExecutor};
use pi_updater::probe::{ConnectivityProbe, ProbeOutcome};

use crate::builders::clean_update;

/// A probe that plays back scripted outcomes, then repeats `fallback`.
///
/// Every check yields to the scheduler once so that a cancellation future
/// raced against the runner gets a chance to fire.
pub struct FakeProbe {
    script: VecDeque<ProbeOutcome>,
    fallback: ProbeOutcome,
    checks: Arc<AtomicU32>,
}

impl FakeProbe {
    pub fn new(script: impl IntoIterator<Item = ProbeOutcome>, fallback: ProbeOutcome) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback,
            checks: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn always_reachable() -> Self {
        Self::new([], ProbeOutcome::Reachable)
    }

    /// Shared counter of completed checks.
    pub fn checks(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.checks)
    }
}

impl ConnectivityProbe for FakeProbe {
    fn check(&mut self) -> Pin<Box<dyn Future<Output = Result<ProbeOutcome>> + Send + '_>> {
        let outcome = self
            .script
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        let checks = Arc::clone(&self.checks);

        Box::pin(async move {
            tokio::task::yield_now().await;
            checks.fetch_add(1, Ordering::SeqCst);
            Ok(outcome)
        })
    }
}

/// An executor that:
/// - records every command it was asked to run
/// - plays back scripted outcomes, then reports clean runs.
pub struct FakeExecutor {
    script: VecDeque<AttemptOutcome>,
    executed: Arc<Mutex<Vec<String>>>,
}

impl FakeExecutor {
    pub fn new(
        script: impl IntoIterator<Item = AttemptOutcome>,
        executed: Arc<Mutex<Vec<String>>>,
    ) -> Self {
        Self {
            script: script.into_iter().collect(),
            executed,
        }
    }
}

impl CommandExecutor for FakeExecutor {
    fn execute<'a>(
        &'a mut self,
        command: &'a Command,
    ) -> Pin<Box<dyn Future<Output = Result<AttemptOutcome>> + Send + 'a>> {
        let outcome = self.script.pop_front().unwrap_or_else(|| Ok(clean_update()));
        let executed = Arc::clone(&self.executed);

        Box::pin(async move {
            {
                let mut guard = executed.lock().unwrap();
                guard.push(command.to_string());
            }
            Ok(outcome)
        })
    }
}

/// A sleeper that records requested delays and returns immediately.
#[derive(Clone, Default)]
pub struct FakeSleeper {
    slept: Arc<Mutex<Vec<Duration>>>,
}

impl FakeSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

impl Sleeper for FakeSleeper {
    fn sleep(&mut self, delay: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        let slept = Arc::clone(&self.slept);
        Box::pin(async move {
            slept.lock().unwrap().push(delay);
        })
    }
}
