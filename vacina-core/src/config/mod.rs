//! Configuration system for Vacina
//!
//! Configuration values are resolved in the following order (highest priority wins):
//!
//! 1. **Code** (CLI flags, builder calls) - Highest priority
//! 2. **Environment Variables** - Override file config
//! 3. **Config File** (vacina.toml) - Override defaults
//! 4. **Defaults** - Lowest priority
//!
//! # Example
//!
//! ```no_run
//! use vacina_core::config::VacinaConfig;
//!
//! let config = VacinaConfig::load()?;
//! config.validate()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod client;
pub mod logging;

pub use client::ClientConfig;
pub use logging::LoggingConfig;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "vacina.toml";

/// Complete Vacina configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VacinaConfig {
    pub client: ClientConfig,
    pub logging: LoggingConfig,
}

impl VacinaConfig {
    /// Load configuration with full supersedence chain
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load from a specific file (skipped when absent), then apply env vars
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config = Self::default();

        if path.exists() {
            let file_config = Self::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.merge(file_config);
        }

        config.apply_env_vars();

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.as_ref().display()))
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        self.client.merge(other.client);
        self.logging.merge(other.logging);
    }

    /// Apply environment variables to configuration
    pub fn apply_env_vars(&mut self) {
        self.client.apply_env_vars();
        self.logging.apply_env_vars();
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.client.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
