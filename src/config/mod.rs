// src/config/mod.rs

//! Optional TOML configuration for the probe and the backoff schedule.
//!
//! - [`model`] holds the serde data model.
//! - [`loader`] reads files and picks defaults.
//! - [`validate`] turns a raw file into a checked `ConfigFile`.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, resolve};
pub use model::{BackoffSection, ConfigFile, ProbeSection, RawConfigFile, ScheduleEntry};
