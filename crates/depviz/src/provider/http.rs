//! Shared HTTP plumbing for the registry adapters.

use super::FetchError;
use crate::config::Config;
use crate::domain::PackageId;
use crate::error::{Error, Result};
use reqwest::{StatusCode, Url};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Connection establishment limit per request.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Idle connections kept per registry host; matches the default worker count.
const MAX_IDLE_PER_HOST: usize = 256;

/// Build the pooled client shared by every worker.
pub(super) fn build_client(config: &Config) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .connect_timeout(CONNECT_TIMEOUT)
        .pool_max_idle_per_host(MAX_IDLE_PER_HOST)
        .build()
        .map_err(|e| Error::Config(format!("cannot build HTTP client: {e}")))
}

/// Append `segments` to `base` as percent-encoded path segments.
///
/// Each segment is encoded on its own, so a `/` inside a package name
/// (npm scopes) does not split it.
pub(super) fn join_segments(base: &Url, segments: &[&str]) -> std::result::Result<Url, FetchError> {
    let mut url = base.clone();
    {
        let mut path = url.path_segments_mut().map_err(|()| FetchError::InvalidUrl {
            url: base.to_string(),
            reason: "URL cannot be a base".to_string(),
        })?;
        path.pop_if_empty();
        for segment in segments {
            path.push(segment);
        }
    }
    Ok(url)
}

/// GET `url` and decode the body as JSON, racing the request against `cancel`.
///
/// A 404 maps to [`FetchError::NotFound`]; any other non-success status or
/// transport failure maps to [`FetchError::Transport`]; a body that is not
/// JSON maps to [`FetchError::Malformed`].
pub(super) async fn get_json(
    client: &reqwest::Client,
    url: Url,
    package: &PackageId,
    cancel: &CancellationToken,
) -> std::result::Result<serde_json::Value, FetchError> {
    let transport = |source| FetchError::Transport {
        package: package.clone(),
        source,
    };

    let request = async {
        tracing::trace!(%url, "registry request");
        let response = client.get(url).send().await.map_err(transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                package: package.clone(),
            });
        }
        let body = response
            .error_for_status()
            .map_err(transport)?
            .bytes()
            .await
            .map_err(transport)?;
        let value = serde_json::from_slice(&body).map_err(|e| FetchError::Malformed {
            package: package.clone(),
            reason: format!("invalid JSON: {e}"),
        })?;
        Ok::<serde_json::Value, FetchError>(value)
    };

    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(FetchError::Cancelled),
        result = request => result,
    }
}
