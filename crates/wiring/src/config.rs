//! Configuration
//!
//! Configuration sources are merged in this order (later sources override earlier):
//! 1. Default values from `WiringConfig::default()`
//! 2. TOML configuration file (explicit path, or `wiring.toml` in the working directory)
//! 3. Environment variables prefixed `WIRING_`, nested with `__`
//!    (e.g. `WIRING_REGISTRY__SCRATCH_CAPACITY=16`)

use std::env;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_FILENAME, DEFAULT_INITIAL_CAPACITY,
    DEFAULT_LOG_LEVEL, DEFAULT_SCRATCH_CAPACITY, MAX_CAPACITY,
};
use crate::error::{Error, ErrorContext, Result};
use crate::logging::{log_config_loaded, parse_log_filter};

/// Sizing of a registry's table and argument buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Number of bindings the table is pre-sized for
    pub initial_capacity: usize,
    /// Number of arguments the scratch buffer is pre-sized for
    pub scratch_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            scratch_capacity: DEFAULT_SCRATCH_CAPACITY,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives (`info`, `off`, `wiring=trace`, `warn,hyper=off`)
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json_format: false,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WiringConfig {
    /// Registry sizing
    pub registry: RegistryConfig,
    /// Logging setup
    pub logging: LoggingConfig,
}

/// Configuration loader
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load and validate configuration from all sources
    pub fn load(&self) -> Result<WiringConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(WiringConfig::default()));

        match &self.config_path {
            Some(config_path) if config_path.exists() => {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            }
            Some(config_path) => log_config_loaded(config_path, false),
            None => {
                if let Some(default_path) = Self::find_default_config_path() {
                    figment = figment.merge(Toml::file(&default_path));
                    log_config_loaded(&default_path, true);
                }
            }
        }

        figment = figment.merge(
            Env::prefixed(&format!("{}_", self.env_prefix)).split(CONFIG_ENV_SEPARATOR),
        );

        let config: WiringConfig = figment
            .extract()
            .context("Failed to extract configuration")?;

        validate_config(&config)?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &WiringConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the configured file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    fn find_default_config_path() -> Option<PathBuf> {
        let path = env::current_dir().ok()?.join(DEFAULT_CONFIG_FILENAME);
        path.exists().then_some(path)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate configuration values
pub fn validate_config(config: &WiringConfig) -> Result<()> {
    parse_log_filter(&config.logging.level)?;

    for (name, value) in [
        ("registry.initial_capacity", config.registry.initial_capacity),
        ("registry.scratch_capacity", config.registry.scratch_capacity),
    ] {
        if value > MAX_CAPACITY {
            return Err(Error::configuration(format!(
                "{name} = {value} exceeds the maximum of {MAX_CAPACITY}"
            )));
        }
    }

    Ok(())
}
