// src/backoff.rs

//! Backoff schedule and the retry counters threaded through the runner.

use std::collections::BTreeMap;
use std::time::Duration;

/// Delay used before any scheduled value applies.
pub const DEFAULT_INITIAL_DELAY_SECS: u64 = 30;

/// Attempt number -> delay in seconds.
pub const DEFAULT_SCHEDULE: [(u32, u64); 5] = [(1, 30), (2, 60), (4, 120), (6, 300), (10, 900)];

/// Deterministic lookup table of delays keyed by attempt number.
///
/// Attempts missing from the table keep the previous delay, so the delay
/// plateaus until the next scheduled attempt is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffSchedule {
    table: BTreeMap<u32, u64>,
    initial_delay_secs: u64,
}

impl BackoffSchedule {
    pub fn new(entries: impl IntoIterator<Item = (u32, u64)>, initial_delay_secs: u64) -> Self {
        Self {
            table: entries.into_iter().collect(),
            initial_delay_secs,
        }
    }

    pub fn next_delay(&self, attempt: u32, previous_delay_secs: u64) -> u64 {
        self.table
            .get(&attempt)
            .copied()
            .unwrap_or(previous_delay_secs)
    }

    pub fn initial_delay_secs(&self) -> u64 {
        self.initial_delay_secs
    }

    pub fn entries(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        self.table.iter().map(|(a, d)| (*a, *d))
    }

    /// Fresh counters for a new run.
    pub fn initial_state(&self) -> RetryState {
        RetryState {
            attempt_count: 0,
            current_delay_secs: self.initial_delay_secs,
        }
    }
}

impl Default for BackoffSchedule {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEDULE, DEFAULT_INITIAL_DELAY_SECS)
    }
}

/// Retry counters for one run. Owned by the runner's core, never global.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    pub attempt_count: u32,
    pub current_delay_secs: u64,
}

impl RetryState {
    /// Count one more interrupted attempt and pick its delay.
    pub fn advance(&mut self, schedule: &BackoffSchedule) -> Duration {
        self.attempt_count += 1;
        self.current_delay_secs = schedule.next_delay(self.attempt_count, self.current_delay_secs);
        self.current_delay()
    }

    /// Start counting again after a connection drop.
    ///
    /// The drop itself counts as the first attempt of the new series, so the
    /// delay is looked up for attempt 1 with the current delay as fallback.
    pub fn restart_count(&mut self, schedule: &BackoffSchedule) -> Duration {
        self.attempt_count = 0;
        self.advance(schedule)
    }

    pub fn current_delay(&self) -> Duration {
        Duration::from_secs(self.current_delay_secs)
    }
}
