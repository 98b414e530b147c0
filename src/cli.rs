// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `pi-updater`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pi-updater",
    version,
    about = "Keep retrying an apt update/upgrade until it really finishes.",
    long_about = None
)]
pub struct CliArgs {
    /// The apt invocation to supervise, e.g. `sudo apt full-upgrade`.
    ///
    /// Accepted: `sudo apt update|upgrade|full-upgrade|dist-upgrade`.
    #[arg(value_name = "WORDS", trailing_var_arg = true)]
    pub words: Vec<String>,

    /// Path to a TOML config file.
    ///
    /// Default: `PiUpdater.toml` in the current directory, if it exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PI_UPDATER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Validate the command and print the effective settings without running anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Disable colored console output.
    #[arg(long)]
    pub no_color: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
