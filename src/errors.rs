// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Transient network conditions are deliberately absent here: they are
//! modelled as values (`ProbeOutcome`, `AttemptError`) and recovered inside
//! the runner. Everything in `UpdaterError` ends the run.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpdaterError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Could not parse command: {0}")]
    CommandParse(String),

    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Connectivity probe failed unexpectedly: {0}")]
    Probe(String),
}

pub type Result<T> = std::result::Result<T, UpdaterError>;
