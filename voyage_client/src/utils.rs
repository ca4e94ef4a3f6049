use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::HTTP_TIMEOUT_SECS;

/// Creates the HTTP client shared by all gateway calls with the following settings:
///
/// - `timeout`: `VOYAGE_HTTP_TIMEOUT_SECS` (30 seconds by default). Calls are fire-once,
///   so this is the only bound on how long a page waits for the backend.
///
/// - `pool_idle_timeout`: 90 seconds, the reqwest default made explicit.
///
/// - `pool_max_idle_per_host`: 32. Every call targets the same backend host.
pub(crate) fn get_client() -> Result<reqwest::Client, UtilError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(*HTTP_TIMEOUT_SECS))
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(32)
        .build()
        .map_err(|e| UtilError::Client(e.to_string()))
}

/// Joins a relative endpoint onto the base URL and appends query pairs.
///
/// The endpoint is appended as text rather than resolved with `Url::join`, so a base URL
/// with a path prefix such as `/api` keeps it.
pub(crate) fn build_url(
    base_url: &str,
    endpoint: &str,
    query: &[(String, String)],
) -> Result<Url, UtilError> {
    if !endpoint.starts_with('/') {
        return Err(UtilError::Format(format!(
            "Endpoint must start with '/': {endpoint}"
        )));
    }

    let raw = format!("{}{}", base_url.trim_end_matches('/'), endpoint);
    let mut url = Url::parse(&raw).map_err(|e| UtilError::Format(format!("{raw}: {e}")))?;

    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }

    Ok(url)
}

/// Percent-encodes a single path segment such as a resource identifier.
pub(crate) fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

#[derive(Debug, Error, Clone)]
pub enum UtilError {
    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("Invalid format: {0}")]
    Format(String),
}
