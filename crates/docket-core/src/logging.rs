//! Logging setup
//!
//! Library crates only emit `tracing` events; binaries call [`init`] once.

use crate::config::LogConfig;
use crate::error::DocketError;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// `RUST_LOG` wins over [`LogConfig::filter`] when set.
///
/// # Errors
/// Returns [`DocketError::Logging`] for an invalid filter or when a global
/// subscriber is already installed.
pub fn init(config: &LogConfig) -> Result<(), DocketError> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.with_target(false).try_init()
    };

    result.map_err(|e| DocketError::Logging(e.to_string()))
}

fn build_filter(config: &LogConfig) -> Result<EnvFilter, DocketError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.filter)
            .map_err(|e| DocketError::Logging(format!("bad filter '{}': {e}", config.filter))),
    }
}
