//! REST client configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// REST client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base address of the REST service; collection paths are joined to it
    /// Env: VC_BASE_URL
    /// Default: "http://127.0.0.1:8000/api/"
    pub base_url: String,

    /// Whole-request timeout in seconds
    /// Env: VC_REQUEST_TIMEOUT
    /// Default: 30
    pub request_timeout_secs: u64,

    /// Connection establishment timeout in seconds
    /// Env: VC_CONNECT_TIMEOUT
    /// Default: 10
    pub connect_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api/".to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        self.base_url = other.base_url;
        self.request_timeout_secs = other.request_timeout_secs;
        self.connect_timeout_secs = other.connect_timeout_secs;
    }

    /// Apply environment variables
    pub fn apply_env_vars(&mut self) {
        if let Ok(url) = env::var("VC_BASE_URL") {
            self.base_url = url;
        }

        if let Ok(timeout) = env::var("VC_REQUEST_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.request_timeout_secs = t;
            }
        }

        if let Ok(timeout) = env::var("VC_CONNECT_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.connect_timeout_secs = t;
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = match reqwest::Url::parse(&self.base_url) {
            Ok(url) => url,
            Err(e) => bail!("Invalid base_url {:?}: {}", self.base_url, e),
        };
        if url.scheme() != "http" && url.scheme() != "https" {
            bail!("Invalid base_url: scheme must be http or https, got {}", url.scheme());
        }

        if self.request_timeout_secs == 0 {
            bail!("Invalid request_timeout_secs: must be greater than 0");
        }

        if self.connect_timeout_secs == 0 {
            bail!("Invalid connect_timeout_secs: must be greater than 0");
        }

        Ok(())
    }
}
