//! Tracing subscriber setup
//!
//! The library only emits `tracing` events. Binaries and tests that want to
//! see them call [`init_tracing`] once.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::error::{Error, Result};

/// Environment variable read for the filter directive.
pub const LOG_ENV: &str = "RUST_LOG";

/// Build the filter from `RUST_LOG`, falling back to `default_level`
/// (e.g. `"info"` or `"burst_plan=debug"`).
///
/// # Errors
///
/// Returns [`Error::Config`] if `default_level` is not a valid directive.
pub fn env_filter(default_level: &str) -> Result<EnvFilter> {
    match std::env::var(LOG_ENV) {
        Ok(directive) if !directive.trim().is_empty() => EnvFilter::try_new(directive),
        _ => EnvFilter::try_new(default_level),
    }
    .map_err(|e| Error::Config(format!("Invalid log filter: {e}")))
}

/// Install a formatted subscriber writing to stderr.
///
/// # Errors
///
/// Returns [`Error::Config`] if the filter is invalid or a global subscriber
/// is already installed.
pub fn init_tracing(default_level: &str) -> Result<()> {
    let filter = env_filter(default_level)?;
    Registry::default()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to install tracing subscriber: {e}")))
}
