//! Configuration management for depviz.
//!
//! Settings come from an optional YAML file (`--config depviz.yaml`) and are
//! then overridden by command-line flags. Every field has a default, so an
//! empty file (or no file) is a valid configuration.
//!
//! ```yaml
//! concurrency: 64
//! timeout-secs: 120
//! registries:
//!   pip: https://pypi.org/pypi
//!   npm: https://registry.npmjs.com/
//! ```

use crate::error::{Error, Result};
use crate::provider::{Registry, npm, pip};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;

/// Default number of concurrent registry lookups.
pub const DEFAULT_CONCURRENCY: usize = 256;

/// Upper bound on the worker count, to avoid hammering a registry.
pub const MAX_CONCURRENCY: usize = 4096;

/// Configuration for a depviz run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    /// Number of workers fetching in parallel.
    pub concurrency: usize,

    /// Deadline for the whole traversal, in seconds.
    pub timeout_secs: Option<u64>,

    /// User agent sent with every registry request.
    pub user_agent: String,

    /// Registry base URLs.
    pub registries: RegistryUrls,
}

/// Base URLs of the supported registries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryUrls {
    /// PyPI JSON API root.
    pub pip: String,
    /// npm registry root.
    pub npm: String,
}

impl Default for RegistryUrls {
    fn default() -> Self {
        Self {
            pip: pip::DEFAULT_BASE_URL.to_string(),
            npm: npm::DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: None,
            user_agent: format!("depviz/{}", env!("CARGO_PKG_VERSION")),
            registries: RegistryUrls::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and `Error::Config`
    /// if it is not valid YAML for this schema.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config = Self::from_yaml(&content)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration from YAML text. Empty text yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` on syntax errors or unknown fields.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Check that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if:
    /// - `concurrency` is 0 or above [`MAX_CONCURRENCY`]
    /// - `timeout-secs` is 0
    /// - a registry URL is not an absolute http(s) URL
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(Error::Config("concurrency must be at least 1".to_string()));
        }
        if self.concurrency > MAX_CONCURRENCY {
            return Err(Error::Config(format!(
                "concurrency cannot exceed {MAX_CONCURRENCY}"
            )));
        }
        if self.timeout_secs == Some(0) {
            return Err(Error::Config("timeout must be greater than 0".to_string()));
        }
        for registry in [Registry::Pip, Registry::Npm] {
            self.registry_url(registry)?;
        }
        Ok(())
    }

    /// The traversal deadline, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Parsed base URL for `registry`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the URL does not parse or is not http(s).
    pub fn registry_url(&self, registry: Registry) -> Result<Url> {
        let raw = match registry {
            Registry::Pip => &self.registries.pip,
            Registry::Npm => &self.registries.npm,
        };
        let url = Url::parse(raw)
            .map_err(|e| Error::Config(format!("invalid {registry} registry URL '{raw}': {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "{registry} registry URL must use http or https, got '{raw}'"
            )));
        }
        Ok(url)
    }
}
