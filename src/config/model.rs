// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::backoff::{BackoffSchedule, DEFAULT_INITIAL_DELAY_SECS, DEFAULT_SCHEDULE};
use crate::probe::{DEFAULT_PROBE_URL, DEFAULT_TIMEOUTS_SECS};

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [probe]
/// url = "https://google.com"
/// timeouts_secs = [1, 5, 10, 15]
///
/// [backoff]
/// initial_delay_secs = 30
/// schedule = [
///   { attempt = 1, delay_secs = 30 },
///   { attempt = 2, delay_secs = 60 },
/// ]
/// ```
///
/// Every section is optional; missing values fall back to the built-in
/// defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub probe: ProbeSection,

    #[serde(default)]
    pub backoff: BackoffSection,
}

/// `[probe]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeSection {
    /// Heartbeat target. Only whether the request succeeds matters.
    #[serde(default = "default_probe_url")]
    pub url: String,

    /// Escalating per-request timeouts, tried in order.
    #[serde(default = "default_timeouts_secs")]
    pub timeouts_secs: Vec<u64>,
}

fn default_probe_url() -> String {
    DEFAULT_PROBE_URL.to_string()
}

fn default_timeouts_secs() -> Vec<u64> {
    DEFAULT_TIMEOUTS_SECS.to_vec()
}

impl Default for ProbeSection {
    fn default() -> Self {
        Self {
            url: default_probe_url(),
            timeouts_secs: default_timeouts_secs(),
        }
    }
}

/// `[backoff]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BackoffSection {
    #[serde(default = "default_initial_delay_secs")]
    pub initial_delay_secs: u64,

    /// Attempt number -> delay. Attempts not listed keep the previous delay.
    #[serde(default = "default_schedule")]
    pub schedule: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub attempt: u32,
    pub delay_secs: u64,
}

fn default_initial_delay_secs() -> u64 {
    DEFAULT_INITIAL_DELAY_SECS
}

fn default_schedule() -> Vec<ScheduleEntry> {
    DEFAULT_SCHEDULE
        .iter()
        .map(|(attempt, delay_secs)| ScheduleEntry {
            attempt: *attempt,
            delay_secs: *delay_secs,
        })
        .collect()
}

impl Default for BackoffSection {
    fn default() -> Self {
        Self {
            initial_delay_secs: default_initial_delay_secs(),
            schedule: default_schedule(),
        }
    }
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (or [`Default`]), so
/// holders can rely on a non-empty probe tier list and a well-formed
/// schedule.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    probe: ProbeSection,
    backoff: BackoffSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(probe: ProbeSection, backoff: BackoffSection) -> Self {
        Self { probe, backoff }
    }

    pub fn probe_url(&self) -> &str {
        &self.probe.url
    }

    pub fn probe_timeouts(&self) -> Vec<Duration> {
        self.probe
            .timeouts_secs
            .iter()
            .map(|s| Duration::from_secs(*s))
            .collect()
    }

    pub fn backoff_schedule(&self) -> BackoffSchedule {
        BackoffSchedule::new(
            self.backoff
                .schedule
                .iter()
                .map(|e| (e.attempt, e.delay_secs)),
            self.backoff.initial_delay_secs,
        )
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(ProbeSection::default(), BackoffSection::default())
    }
}
