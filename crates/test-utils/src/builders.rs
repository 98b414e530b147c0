#![allow(dead_code)]

use pi_updater::classify::{ARCHIVES_MARKER, INDEX_MARKER};
use pi_updater::exec::AttemptResult;

/// Builder for `AttemptResult` to simplify test setup.
pub struct AttemptResultBuilder {
    result: AttemptResult,
}

impl AttemptResultBuilder {
    pub fn new() -> Self {
        Self {
            result: AttemptResult {
                exit_code: Some(0),
                stdout: String::new(),
                stderr: String::new(),
            },
        }
    }

    pub fn stdout(mut self, text: &str) -> Self {
        self.result.stdout.push_str(text);
        self
    }

    pub fn stderr(mut self, text: &str) -> Self {
        self.result.stderr.push_str(text);
        self
    }

    pub fn exit_code(mut self, code: Option<i32>) -> Self {
        self.result.exit_code = code;
        self
    }

    pub fn build(self) -> AttemptResult {
        self.result
    }
}

impl Default for AttemptResultBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A run apt would consider complete.
pub fn clean_update() -> AttemptResult {
    AttemptResultBuilder::new()
        .stdout("Hit:1 http://raspbian.raspberrypi.org/raspbian bookworm InRelease\nReading package lists... Done\n")
        .build()
}

/// An upgrade whose archive downloads were cut short.
pub fn interrupted_upgrade() -> AttemptResult {
    AttemptResultBuilder::new()
        .stdout("Need to get 89.0 MB/213 MB of archives.\n")
        .stderr(&format!(
            "E: Failed to fetch http://archive.raspberrypi.org/debian/pool/main/x.deb  Connection timed out\nE: {ARCHIVES_MARKER}, maybe run apt-get update or try with --fix-missing?\n"
        ))
        .build()
}

/// An update whose index downloads failed.
pub fn interrupted_update() -> AttemptResult {
    AttemptResultBuilder::new()
        .stderr(&format!(
            "W: {INDEX_MARKER}. They have been ignored, or old ones used instead.\n"
        ))
        .build()
}
