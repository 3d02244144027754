//! PyPI adapter.
//!
//! Looks packages up through the JSON API (`GET <base>/<name>/json`) and
//! reads `info.requires_dist`, a list of PEP 508 requirement strings such as
//! `"pydantic>=1.7.4,!=1.8"` or `"pytest; extra == 'test'"`.

use super::http::{get_json, join_segments};
use super::{FetchError, Fetcher};
use crate::domain::PackageId;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;
use tokio_util::sync::CancellationToken;

/// Default PyPI JSON API root.
pub const DEFAULT_BASE_URL: &str = "https://pypi.python.org/pypi";

/// Leading distribution name of a requirement string.
static REQUIREMENT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._-]+").expect("requirement name pattern is valid"));

/// Fetcher for the Python Package Index.
#[derive(Debug, Clone)]
pub struct PipFetcher {
    client: reqwest::Client,
    base_url: Url,
}

impl PipFetcher {
    /// Create a fetcher rooted at `base_url` (e.g. [`DEFAULT_BASE_URL`]).
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl Fetcher for PipFetcher {
    async fn fetch_dependencies(
        &self,
        package: &PackageId,
        cancel: &CancellationToken,
    ) -> Result<Vec<PackageId>, FetchError> {
        let url = join_segments(&self.base_url, &[package.as_str(), "json"])?;
        let body = get_json(&self.client, url, package, cancel).await?;
        let requirements = parse_requires_dist(package, &body)?;
        let deps = clean_requirements(&requirements);
        tracing::debug!(%package, count = deps.len(), "fetched pip dependencies");
        Ok(deps)
    }
}

/// Extract `info.requires_dist` from a PyPI JSON document.
///
/// `null` means "no dependencies"; a missing key or a missing `info` object
/// is a schema violation.
pub(crate) fn parse_requires_dist(
    package: &PackageId,
    body: &Value,
) -> Result<Vec<String>, FetchError> {
    let malformed = |reason: &str| FetchError::Malformed {
        package: package.clone(),
        reason: reason.to_string(),
    };

    let info = body
        .get("info")
        .and_then(Value::as_object)
        .ok_or_else(|| malformed("missing 'info' object"))?;

    match info.get("requires_dist") {
        None => Err(malformed("missing 'info.requires_dist'")),
        Some(Value::Null) => Ok(Vec::new()),
        Some(value) => Vec::<String>::deserialize(value)
            .map_err(|e| malformed(&format!("'info.requires_dist': {e}"))),
    }
}

/// Reduce requirement strings to bare package names.
///
/// Requirements guarded by an `extra` marker are optional and dropped.
/// Everything after the leading name (version specifiers, environment
/// markers, URL references) is stripped. Entries without a name are skipped.
pub(crate) fn clean_requirements(requirements: &[String]) -> Vec<PackageId> {
    requirements
        .iter()
        .filter(|req| !is_extra(req))
        .filter_map(|req| REQUIREMENT_NAME.find(req.trim_start()))
        .map(|m| PackageId::new(m.as_str()))
        .collect()
}

fn is_extra(requirement: &str) -> bool {
    requirement
        .split_once(';')
        .is_some_and(|(_, marker)| marker.contains("extra"))
}
