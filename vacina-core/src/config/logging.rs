//! Logging configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

const LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace", "off"];
const FORMATS: &[&str] = &["human", "json"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Env: VC_LOG_LEVEL
    pub level: String,
    /// "human" or "json"
    /// Env: VC_LOG_FORMAT
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "human".to_string() }
    }
}

impl LoggingConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(level) = env::var("VC_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(format) = env::var("VC_LOG_FORMAT") {
            self.format = format;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !LEVELS.contains(&self.level.to_ascii_lowercase().as_str()) {
            bail!("Invalid log level {:?}: expected one of {}", self.level, LEVELS.join(", "));
        }
        if !FORMATS.contains(&self.format.to_ascii_lowercase().as_str()) {
            bail!("Invalid log format {:?}: expected one of {}", self.format, FORMATS.join(", "));
        }
        Ok(())
    }
}
