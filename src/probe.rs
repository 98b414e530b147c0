// src/probe.rs

//! Connectivity heartbeat.
//!
//! Before each attempt the runner asks a [`ConnectivityProbe`] whether the
//! network is usable. The production [`HttpProbe`] issues a GET against a
//! well-known host, trying progressively longer timeouts; the response body
//! is never read.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{debug, warn};

use crate::console::Console;
use crate::errors::{Result, UpdaterError};

pub const DEFAULT_PROBE_URL: &str = "https://google.com";
pub const DEFAULT_TIMEOUTS_SECS: [u64; 4] = [1, 5, 10, 15];

/// Result of one connectivity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// A tier got a successful response.
    Reachable,
    /// Every tier failed to connect or timed out.
    Unreachable,
    /// The remote end closed the connection mid-exchange.
    Dropped(String),
}

impl ProbeOutcome {
    pub fn is_reachable(&self) -> bool {
        matches!(self, ProbeOutcome::Reachable)
    }
}

/// Trait abstracting the connectivity check.
///
/// Ordinary network failures are outcomes, not errors. `Err` is reserved
/// for problems no amount of waiting will fix (bad URL, broken TLS setup).
pub trait ConnectivityProbe: Send {
    fn check(&mut self) -> Pin<Box<dyn Future<Output = Result<ProbeOutcome>> + Send + '_>>;
}

/// How a single tier ended.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TierOutcome {
    Success,
    Failed(String),
    Dropped(String),
}

/// Probe backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    url: String,
    timeouts: Vec<Duration>,
    console: Console,
}

impl HttpProbe {
    pub fn new(url: impl Into<String>, timeouts: Vec<Duration>, console: Console) -> Self {
        Self {
            url: url.into(),
            timeouts,
            console,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeouts(&self) -> &[Duration] {
        &self.timeouts
    }

    async fn run_tiers(&self) -> Result<ProbeOutcome> {
        for (tier, timeout) in self.timeouts.iter().enumerate() {
            match self.try_once(*timeout).await? {
                TierOutcome::Success => {
                    debug!(url = %self.url, tier, ?timeout, "connectivity confirmed");
                    return Ok(ProbeOutcome::Reachable);
                }
                TierOutcome::Failed(reason) => {
                    warn!(url = %self.url, tier, ?timeout, %reason, "connectivity tier failed");
                    self.console.print_timestamped_problem(&reason);
                }
                TierOutcome::Dropped(reason) => {
                    warn!(url = %self.url, tier, %reason, "connection dropped during probe");
                    return Ok(ProbeOutcome::Dropped(reason));
                }
            }
        }
        Ok(ProbeOutcome::Unreachable)
    }

    async fn try_once(&self, timeout: Duration) -> Result<TierOutcome> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpdaterError::Probe(format!("building HTTP client: {e}")))?;

        let response = match client.get(&self.url).send().await {
            Ok(response) => response,
            Err(e) => return classify_transport_error(e),
        };

        match response.error_for_status() {
            Ok(_) => Ok(TierOutcome::Success),
            Err(e) => Ok(TierOutcome::Failed(e.to_string())),
        }
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new(
            DEFAULT_PROBE_URL,
            DEFAULT_TIMEOUTS_SECS.iter().map(|s| Duration::from_secs(*s)).collect(),
            Console::quiet(),
        )
    }
}

impl ConnectivityProbe for HttpProbe {
    fn check(&mut self) -> Pin<Box<dyn Future<Output = Result<ProbeOutcome>> + Send + '_>> {
        Box::pin(self.run_tiers())
    }
}

fn classify_transport_error(e: reqwest::Error) -> Result<TierOutcome> {
    if e.is_builder() {
        return Err(UpdaterError::Probe(e.to_string()));
    }
    if e.is_connect() || e.is_timeout() {
        return Ok(TierOutcome::Failed(e.to_string()));
    }
    if e.is_request() || e.is_body() {
        return Ok(TierOutcome::Dropped(e.to_string()));
    }
    // Redirect loops, decode errors and the like still mean "not usable".
    Ok(TierOutcome::Failed(e.to_string()))
}
