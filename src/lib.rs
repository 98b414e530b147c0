// src/lib.rs

pub mod backoff;
pub mod classify;
pub mod cli;
pub mod command;
pub mod config;
pub mod console;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod probe;

use std::future::Future;
use std::io::IsTerminal;
use std::time::Instant;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::backoff::BackoffSchedule;
use crate::cli::CliArgs;
use crate::command::{rejected_input, validate, Command};
use crate::config::ConfigFile;
use crate::console::{Console, Tone};
use crate::engine::{RetryCore, RetryingRunner, RunOutcome, RunReport, Sleeper, TokioSleeper};
use crate::exec::{CommandExecutor, ProcessExecutor};
use crate::probe::{ConnectivityProbe, HttpProbe};

/// What happened to the words given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Supervision {
    /// The words failed the whitelist; nothing was run.
    Rejected(String),
    /// The command was supervised until success or cancellation.
    Finished(RunReport),
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the HTTP connectivity probe
/// - the process executor
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let console = Console::new(!args.no_color && std::io::stdout().is_terminal());
    let cfg = config::resolve(args.config.as_deref())?;

    if args.dry_run {
        print_dry_run(&args.words, &cfg, &console);
        return Ok(());
    }

    let probe = HttpProbe::new(cfg.probe_url(), cfg.probe_timeouts(), console.clone());

    supervise(
        &args.words,
        cfg.backoff_schedule(),
        probe,
        ProcessExecutor::new(),
        TokioSleeper,
        console,
        ctrl_c(),
    )
    .await?;

    Ok(())
}

/// Validate `words` and, if accepted, keep running them until they finish.
///
/// Prints the start/finish/interruption messages and the total time spent.
/// Rejected input is reported and is not an error.
pub async fn supervise<P, E, S, C>(
    words: &[String],
    schedule: BackoffSchedule,
    probe: P,
    executor: E,
    sleeper: S,
    console: Console,
    cancel: C,
) -> errors::Result<Supervision>
where
    P: ConnectivityProbe,
    E: CommandExecutor,
    S: Sleeper,
    C: Future<Output = ()>,
{
    let Some(validated) = validate(words) else {
        let message = rejected_input(words);
        info!(?words, "input rejected");
        console.print(&message, Tone::Error);
        return Ok(Supervision::Rejected(message));
    };

    let command = Command::parse(&validated)?;
    let started = Instant::now();

    let mut runner = RetryingRunner::new(
        RetryCore::new(schedule),
        probe,
        executor,
        sleeper,
        console.clone(),
    );
    let report = runner.run(&command, cancel).await?;

    match report.outcome {
        RunOutcome::Succeeded => console.print_dated("Process finished at", Tone::Success),
        RunOutcome::Cancelled => console.print_dated("Process interrupted at", Tone::Emphasis),
    }
    console.print_elapsed(started.elapsed());

    Ok(Supervision::Finished(report))
}

/// Resolves on the first Ctrl-C. If the signal handler cannot be installed
/// the run simply cannot be cancelled this way.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

/// Print what would be supervised, and with which settings.
fn print_dry_run(words: &[String], cfg: &ConfigFile, console: &Console) {
    println!("pi-updater dry-run");

    match validate(words) {
        Some(command) => println!("  command = {command}"),
        None => {
            console.print(&rejected_input(words), Tone::Error);
            return;
        }
    }

    println!("  probe.url = {}", cfg.probe_url());
    println!("  probe.timeouts = {:?}", cfg.probe_timeouts());

    let schedule = cfg.backoff_schedule();
    println!("  backoff.initial_delay_secs = {}", schedule.initial_delay_secs());
    for (attempt, delay) in schedule.entries() {
        println!("  backoff attempt {attempt} -> {delay}s");
    }

    debug!("dry-run complete (no execution)");
}
