//! Registry adapters: turn a package name into its direct dependencies.
//!
//! The discovery engine only sees the [`Fetcher`] trait. Each registry kind
//! has one implementation:
//!
//! - **pip**: the PyPI JSON API (`/<name>/json`, `info.requires_dist`)
//! - **npm**: the npm registry (`/<name>/latest`, `dependencies`)
//!
//! # Architecture
//!
//! Implementations must be `Send + Sync` and safe to call concurrently from
//! every worker of the pool. The HTTP adapters share one pooled
//! `reqwest::Client`, so concurrent calls reuse connections.
//!
//! # Example
//!
//! ```no_run
//! use depviz::config::Config;
//! use depviz::provider::{Registry, create_fetcher};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let fetcher = create_fetcher(Registry::Pip, &Config::default())?;
//!     let deps = fetcher
//!         .fetch_dependencies(&"fastapi".into(), &CancellationToken::new())
//!         .await?;
//!     println!("{deps:?}");
//!     Ok(())
//! }
//! ```

mod http;
pub mod npm;
pub mod pip;

pub use npm::NpmFetcher;
pub use pip::PipFetcher;

use crate::config::Config;
use crate::domain::PackageId;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Source of a package's direct dependencies.
///
/// # Cancellation
///
/// Implementations should return [`FetchError::Cancelled`] promptly once
/// `cancel` fires. The engine also drops in-flight calls on shutdown, so an
/// implementation that ignores the token only delays its own cleanup.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Return the direct dependencies of `package`, in registry order.
    ///
    /// # Errors
    ///
    /// - `FetchError::NotFound` if the registry has no such package
    /// - `FetchError::Malformed` if the response does not match the schema
    /// - `FetchError::Transport` if the request itself failed
    /// - `FetchError::Cancelled` if `cancel` fired first
    async fn fetch_dependencies(
        &self,
        package: &PackageId,
        cancel: &CancellationToken,
    ) -> std::result::Result<Vec<PackageId>, FetchError>;
}

/// Why a registry lookup failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The registry reported that the package does not exist.
    #[error("Package not found: {package}")]
    NotFound {
        /// The package that was looked up.
        package: PackageId,
    },

    /// The registry answered, but not with the expected document.
    #[error("Malformed registry response for '{package}': {reason}")]
    Malformed {
        /// The package that was looked up.
        package: PackageId,
        /// What was wrong with the response.
        reason: String,
    },

    /// The request failed (connection, TLS, non-success status, body read).
    #[error("Registry request for '{package}' failed: {source}")]
    Transport {
        /// The package that was looked up.
        package: PackageId,
        /// The underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },

    /// A request URL could not be built from the registry base URL.
    #[error("Invalid registry URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending base URL.
        url: String,
        /// Why it cannot be used.
        reason: String,
    },

    /// The lookup was abandoned because the traversal is shutting down.
    #[error("Registry lookup was cancelled")]
    Cancelled,
}

impl FetchError {
    /// Returns `true` for [`FetchError::Cancelled`].
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Supported package registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Registry {
    /// The Python Package Index.
    #[default]
    Pip,
    /// The npm registry.
    Npm,
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pip => f.write_str("pip"),
            Self::Npm => f.write_str("npm"),
        }
    }
}

/// Create the fetcher for `registry`, configured from `config`.
///
/// # Errors
///
/// Returns `Error::Config` if the HTTP client cannot be built or the
/// configured registry URL is unusable.
pub fn create_fetcher(registry: Registry, config: &Config) -> Result<Arc<dyn Fetcher>> {
    let client = http::build_client(config)?;
    let fetcher: Arc<dyn Fetcher> = match registry {
        Registry::Pip => Arc::new(PipFetcher::new(client, config.registry_url(registry)?)),
        Registry::Npm => Arc::new(NpmFetcher::new(client, config.registry_url(registry)?)),
    };
    tracing::debug!(%registry, "created registry fetcher");
    Ok(fetcher)
}
