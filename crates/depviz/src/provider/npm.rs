//! npm registry adapter.
//!
//! Looks packages up through `GET <base>/<name>/latest` and returns the keys
//! of the manifest's `dependencies` object. Scoped names (`@vue/shared`) are
//! sent as a single percent-encoded path segment.

use super::http::{get_json, join_segments};
use super::{FetchError, Fetcher};
use crate::domain::PackageId;
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Default npm registry root.
pub const DEFAULT_BASE_URL: &str = "https://registry.npmjs.com/";

/// Fetcher for the npm registry.
#[derive(Debug, Clone)]
pub struct NpmFetcher {
    client: reqwest::Client,
    base_url: Url,
}

impl NpmFetcher {
    /// Create a fetcher rooted at `base_url` (e.g. [`DEFAULT_BASE_URL`]).
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl Fetcher for NpmFetcher {
    async fn fetch_dependencies(
        &self,
        package: &PackageId,
        cancel: &CancellationToken,
    ) -> Result<Vec<PackageId>, FetchError> {
        let url = join_segments(&self.base_url, &[package.as_str(), "latest"])?;
        let body = get_json(&self.client, url, package, cancel).await?;
        let deps = parse_dependencies(package, &body)?;
        tracing::debug!(%package, count = deps.len(), "fetched npm dependencies");
        Ok(deps)
    }
}

/// Extract the dependency names from an npm version manifest.
///
/// Manifests of packages without runtime dependencies omit the key (or set
/// it to `null`); both mean "no dependencies". Version ranges are ignored.
pub(crate) fn parse_dependencies(
    package: &PackageId,
    body: &Value,
) -> Result<Vec<PackageId>, FetchError> {
    let malformed = |reason: String| FetchError::Malformed {
        package: package.clone(),
        reason,
    };

    let manifest = body
        .as_object()
        .ok_or_else(|| malformed("manifest is not a JSON object".to_string()))?;

    match manifest.get("dependencies") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Object(deps)) => Ok(deps.keys().map(PackageId::new).collect()),
        Some(other) => Err(malformed(format!(
            "'dependencies' must be an object, got {other}"
        ))),
    }
}
