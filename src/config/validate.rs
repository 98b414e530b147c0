// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, UpdaterError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::UpdaterError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.probe, raw.backoff))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_probe(cfg)?;
    validate_backoff(cfg)?;
    Ok(())
}

fn validate_probe(cfg: &RawConfigFile) -> Result<()> {
    if cfg.probe.url.trim().is_empty() {
        return Err(UpdaterError::ConfigError(
            "[probe].url must not be empty".to_string(),
        ));
    }

    if cfg.probe.timeouts_secs.is_empty() {
        return Err(UpdaterError::ConfigError(
            "[probe].timeouts_secs must list at least one timeout".to_string(),
        ));
    }

    if let Some(zero) = cfg.probe.timeouts_secs.iter().position(|t| *t == 0) {
        return Err(UpdaterError::ConfigError(format!(
            "[probe].timeouts_secs[{zero}] must be >= 1 (got 0)"
        )));
    }

    Ok(())
}

fn validate_backoff(cfg: &RawConfigFile) -> Result<()> {
    if cfg.backoff.initial_delay_secs == 0 {
        return Err(UpdaterError::ConfigError(
            "[backoff].initial_delay_secs must be >= 1 (got 0)".to_string(),
        ));
    }

    let mut seen = HashSet::new();

    for entry in cfg.backoff.schedule.iter() {
        if entry.attempt == 0 {
            return Err(UpdaterError::ConfigError(
                "[backoff].schedule attempts start at 1 (got 0)".to_string(),
            ));
        }
        if entry.delay_secs == 0 {
            return Err(UpdaterError::ConfigError(format!(
                "[backoff].schedule delay for attempt {} must be >= 1 (got 0)",
                entry.attempt
            )));
        }
        if !seen.insert(entry.attempt) {
            return Err(UpdaterError::ConfigError(format!(
                "[backoff].schedule lists attempt {} more than once",
                entry.attempt
            )));
        }
    }

    Ok(())
}
