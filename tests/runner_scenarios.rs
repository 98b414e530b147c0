// tests/runner_scenarios.rs

use pi_updater_test_utils::builders::{clean_update, interrupted_update, interrupted_upgrade};
use pi_updater_test_utils::fakes::{FakeExecutor, FakeProbe, FakeSleeper};
use pi_updater_test_utils::{init_tracing, with_timeout};

use std::error::Error;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pi_updater::backoff::BackoffSchedule;
use pi_updater::command::Command;
use pi_updater::console::Console;
use pi_updater::engine::{RetryCore, RetryingRunner, RunOutcome};
use pi_updater::exec::AttemptError;
use pi_updater::probe::ProbeOutcome;

type TestResult = Result<(), Box<dyn Error>>;

fn apt_update() -> Command {
    Command::parse("sudo apt update").unwrap()
}

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

fn runner(
    probe: FakeProbe,
    executor: FakeExecutor,
    sleeper: FakeSleeper,
) -> RetryingRunner<FakeProbe, FakeExecutor, FakeSleeper> {
    RetryingRunner::new(
        RetryCore::new(BackoffSchedule::default()),
        probe,
        executor,
        sleeper,
        Console::quiet(),
    )
}

#[tokio::test]
async fn clean_first_run_succeeds_after_one_attempt() -> TestResult {
    init_tracing();

    let executed = Arc::new(Mutex::new(Vec::new()));
    let sleeper = FakeSleeper::new();
    let mut runner = runner(
        FakeProbe::always_reachable(),
        FakeExecutor::new([Ok(clean_update())], executed.clone()),
        sleeper.clone(),
    );

    let report = with_timeout(runner.run(&apt_update(), std::future::pending())).await?;

    assert_eq!(report.outcome, RunOutcome::Succeeded);
    assert_eq!(report.attempts, 1);
    assert!(report.delays.is_empty());
    assert!(sleeper.slept().is_empty());
    assert_eq!(*executed.lock().unwrap(), vec!["sudo apt update".to_string()]);
    Ok(())
}

#[tokio::test]
async fn interrupted_run_waits_thirty_seconds_before_second_attempt() -> TestResult {
    init_tracing();

    let executed = Arc::new(Mutex::new(Vec::new()));
    let sleeper = FakeSleeper::new();
    let mut runner = runner(
        FakeProbe::always_reachable(),
        FakeExecutor::new([Ok(interrupted_upgrade()), Ok(clean_update())], executed.clone()),
        sleeper.clone(),
    );

    let report = with_timeout(runner.run(&apt_update(), std::future::pending())).await?;

    assert_eq!(report.outcome, RunOutcome::Succeeded);
    assert_eq!(report.attempts, 2);
    assert_eq!(sleeper.slept(), vec![secs(30)]);
    assert_eq!(executed.lock().unwrap().len(), 2);
    Ok(())
}

#[tokio::test]
async fn repeated_interruptions_follow_the_schedule() -> TestResult {
    init_tracing();

    let script: Vec<_> = (0..11)
        .map(|i| {
            if i % 2 == 0 {
                Ok(interrupted_upgrade())
            } else {
                Ok(interrupted_update())
            }
        })
        .collect();

    let executed = Arc::new(Mutex::new(Vec::new()));
    let sleeper = FakeSleeper::new();
    let mut runner = runner(
        FakeProbe::always_reachable(),
        FakeExecutor::new(script, executed.clone()),
        sleeper.clone(),
    );

    let report = with_timeout(runner.run(&apt_update(), std::future::pending())).await?;

    assert_eq!(report.outcome, RunOutcome::Succeeded);
    assert_eq!(report.attempts, 12);
    assert_eq!(report.retry_state.attempt_count, 11);
    assert_eq!(
        sleeper.slept(),
        [30, 60, 60, 120, 120, 300, 300, 300, 300, 900, 900]
            .into_iter()
            .map(secs)
            .collect::<Vec<_>>()
    );
    Ok(())
}

#[tokio::test]
async fn unreachable_network_keeps_probing_without_counting_attempts() -> TestResult {
    init_tracing();

    let probe = FakeProbe::new([], ProbeOutcome::Unreachable);
    let checks = probe.checks();
    let executed = Arc::new(Mutex::new(Vec::new()));
    let sleeper = FakeSleeper::new();
    let mut runner = runner(probe, FakeExecutor::new([], executed.clone()), sleeper.clone());

    let cancel = {
        let checks = Arc::clone(&checks);
        async move {
            while checks.load(Ordering::SeqCst) < 8 {
                tokio::task::yield_now().await;
            }
        }
    };

    let report = with_timeout(runner.run(&apt_update(), cancel)).await?;

    assert_eq!(report.outcome, RunOutcome::Cancelled);
    assert!(report.probes >= 8);
    assert_eq!(report.attempts, 0);
    assert_eq!(report.retry_state.attempt_count, 0);
    assert!(sleeper.slept().is_empty());
    assert!(executed.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn connectivity_returning_lets_the_attempt_start() -> TestResult {
    init_tracing();

    let probe = FakeProbe::new(
        [ProbeOutcome::Unreachable, ProbeOutcome::Unreachable],
        ProbeOutcome::Reachable,
    );
    let checks = probe.checks();
    let executed = Arc::new(Mutex::new(Vec::new()));
    let mut runner = runner(probe, FakeExecutor::new([], executed.clone()), FakeSleeper::new());

    let report = with_timeout(runner.run(&apt_update(), std::future::pending())).await?;

    assert_eq!(report.outcome, RunOutcome::Succeeded);
    assert_eq!(checks.load(Ordering::SeqCst), 3);
    assert_eq!(report.probes, 3);
    assert_eq!(report.attempts, 1);
    Ok(())
}

#[tokio::test]
async fn dropped_connection_restarts_backoff_from_first_attempt() -> TestResult {
    init_tracing();

    let executed = Arc::new(Mutex::new(Vec::new()));
    let sleeper = FakeSleeper::new();
    let mut runner = runner(
        FakeProbe::always_reachable(),
        FakeExecutor::new(
            [
                Ok(interrupted_upgrade()),
                Ok(interrupted_upgrade()),
                Err(AttemptError::ConnectionDropped(
                    "Remote end closed connection without response".to_string(),
                )),
                Ok(interrupted_upgrade()),
                Ok(clean_update()),
            ],
            executed.clone(),
        ),
        sleeper.clone(),
    );

    let report = with_timeout(runner.run(&apt_update(), std::future::pending())).await?;

    assert_eq!(report.outcome, RunOutcome::Succeeded);
    assert_eq!(report.attempts, 5);
    // 30, 60, then the drop counts as attempt 1 again, so 30 and 60 repeat.
    assert_eq!(sleeper.slept(), vec![secs(30), secs(60), secs(30), secs(60)]);
    assert_eq!(report.retry_state.attempt_count, 2);
    Ok(())
}

#[tokio::test]
async fn dropped_probe_sleeps_then_probes_again() -> TestResult {
    init_tracing();

    let probe = FakeProbe::new(
        [ProbeOutcome::Dropped("connection reset by peer".to_string())],
        ProbeOutcome::Reachable,
    );
    let executed = Arc::new(Mutex::new(Vec::new()));
    let sleeper = FakeSleeper::new();
    let mut runner = runner(probe, FakeExecutor::new([], executed.clone()), sleeper.clone());

    let report = with_timeout(runner.run(&apt_update(), std::future::pending())).await?;

    assert_eq!(report.outcome, RunOutcome::Succeeded);
    assert_eq!(report.probes, 2);
    assert_eq!(report.attempts, 1);
    assert_eq!(sleeper.slept(), vec![secs(30)]);
    Ok(())
}

#[tokio::test]
async fn custom_schedule_is_honoured() -> TestResult {
    init_tracing();

    let executed = Arc::new(Mutex::new(Vec::new()));
    let sleeper = FakeSleeper::new();
    let mut runner = RetryingRunner::new(
        RetryCore::new(BackoffSchedule::new([(1, 2), (3, 7)], 2)),
        FakeProbe::always_reachable(),
        FakeExecutor::new(
            [
                Ok(interrupted_update()),
                Ok(interrupted_update()),
                Ok(interrupted_update()),
            ],
            executed,
        ),
        sleeper.clone(),
        Console::quiet(),
    );

    let report = with_timeout(runner.run(&apt_update(), std::future::pending())).await?;

    assert_eq!(report.attempts, 4);
    assert_eq!(sleeper.slept(), vec![secs(2), secs(2), secs(7)]);
    Ok(())
}
