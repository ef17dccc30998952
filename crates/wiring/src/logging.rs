//! Structured logging with tracing
//!
//! The library only emits `tracing` events. Hosts that do not install their
//! own subscriber can call [`init_logging`].

use std::path::Path;

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::constants::LOG_ENV_VAR;
use crate::error::{Error, Result};

pub use crate::config::LoggingConfig;

/// Install a global subscriber for the given configuration
///
/// `WIRING_LOG` overrides the configured filter. Fails instead of panicking
/// when a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let configured = parse_log_filter(&config.level)?;
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or(configured);
    let directives = filter.to_string();

    let registry = Registry::default().with(filter);
    let installed = if config.json_format {
        registry
            .with(fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };
    installed.map_err(|e| Error::configuration_with_source("Failed to initialize logging", e))?;

    info!("Logging initialized with filter: {}", directives);
    Ok(())
}

/// Parse a log filter
///
/// Accepts anything `EnvFilter` does: a bare level (`info`, `off`), a target
/// directive (`wiring=trace`) or a comma-separated list of both
/// (`warn,hyper=off`).
pub fn parse_log_filter(filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|e| {
        Error::configuration_with_source(format!("Invalid log filter: {filter}"), e)
    })
}

/// Log configuration loading status
pub fn log_config_loaded(config_path: &Path, success: bool) {
    if success {
        info!("Configuration loaded from {}", config_path.display());
    } else {
        warn!("Configuration file not found: {}", config_path.display());
    }
}
