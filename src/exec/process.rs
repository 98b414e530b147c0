// src/exec/process.rs

//! Single attempt process runner.

use std::process::Stdio;

use tokio::process::Command as ProcessCommand;
use tracing::{debug, info, warn};

use crate::command::Command;
use crate::errors::{Result, UpdaterError};

use super::{AttemptError, AttemptOutcome, AttemptResult};

/// Spawn `command`, wait for it, and capture stdout and stderr as text.
///
/// The child inherits stdin so that `sudo` can still prompt for a password.
/// It is not killed when this future is dropped: on Ctrl-C the child gets
/// the terminal's SIGINT itself and finishes on its own terms.
pub async fn run_attempt(command: &Command) -> Result<AttemptOutcome> {
    info!(cmd = %command, "starting process");

    let child = ProcessCommand::new(command.program())
        .args(command.args())
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(false)
        .spawn()
        .map_err(|source| UpdaterError::Spawn {
            program: command.program().to_string(),
            source,
        })?;

    let output = match child.wait_with_output().await {
        Ok(output) => output,
        Err(e) => {
            warn!(cmd = %command, error = %e, "lost the child's output mid-run");
            return Ok(Err(AttemptError::ConnectionDropped(format!(
                "lost output of '{command}': {e}"
            ))));
        }
    };

    let result = AttemptResult {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    debug!(
        cmd = %command,
        exit_code = ?result.exit_code,
        stdout_bytes = output.stdout.len(),
        stderr_bytes = output.stderr.len(),
        "process exited"
    );

    Ok(Ok(result))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout_and_stderr_separately() {
        let command = Command::parse("sh -c 'echo out; echo err >&2; exit 3'").unwrap();
        let result = run_attempt(&command).await.unwrap().unwrap();
        assert_eq!(result.stdout, "out\n");
        assert_eq!(result.stderr, "err\n");
        assert_eq!(result.exit_code, Some(3));
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let command = Command::parse("definitely-not-a-real-program-pi-updater").unwrap();
        match run_attempt(&command).await {
            Err(UpdaterError::Spawn { program, .. }) => {
                assert_eq!(program, "definitely-not-a-real-program-pi-updater");
            }
            other => panic!("expected spawn error, got {other:?}"),
        }
    }
}
