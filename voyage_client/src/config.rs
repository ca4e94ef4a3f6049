//! Central configuration for the voyage_client crate

use std::env;
use std::sync::LazyLock;

const DEFAULT_API_URL: &str = "http://localhost:3001/api";
const DEFAULT_AUTH_TOKEN_KEY: &str = "auth_token";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Base URL of the backend REST API
///
/// Every gateway endpoint is appended to this value verbatim, so it may carry a path prefix.
/// Default: "http://localhost:3001/api"
pub static VOYAGE_API_URL: LazyLock<String> =
    LazyLock::new(|| api_url(env::var("VOYAGE_API_URL").ok()));

/// Well-known storage key under which the bearer token is persisted
pub static AUTH_TOKEN_KEY: LazyLock<String> =
    LazyLock::new(|| auth_token_key(env::var("VOYAGE_AUTH_TOKEN_KEY").ok()));

pub(crate) static HTTP_TIMEOUT_SECS: LazyLock<u64> =
    LazyLock::new(|| http_timeout_secs(env::var("VOYAGE_HTTP_TIMEOUT_SECS").ok().as_deref()));

fn api_url(value: Option<String>) -> String {
    value.unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

fn auth_token_key(value: Option<String>) -> String {
    value
        .filter(|key| !key.is_empty())
        .unwrap_or_else(|| DEFAULT_AUTH_TOKEN_KEY.to_string())
}

/// Unset or unparsable values fall back to 30 seconds
fn http_timeout_secs(value: Option<&str>) -> u64 {
    value
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS)
}
