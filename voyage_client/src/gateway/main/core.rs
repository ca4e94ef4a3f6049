use http::StatusCode;
use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;

use crate::config::VOYAGE_API_URL;
use crate::gateway::errors::{DEFAULT_ERROR_MESSAGE, GatewayError};
use crate::gateway::types::ApiRequest;
use crate::session::SessionContext;
use crate::utils::{UtilError, build_url, get_client};

/// The single channel through which feature code reaches the backend.
///
/// Attaches the persisted bearer token, normalizes error responses and evicts the
/// session when the backend answers 401. Cloning shares the underlying HTTP connection
/// pool and session.
#[derive(Clone)]
pub struct ApiGateway {
    client: reqwest::Client,
    base_url: String,
    session: SessionContext,
}

impl ApiGateway {
    /// Gateway against `VOYAGE_API_URL`
    pub fn new(session: SessionContext) -> Result<Self, GatewayError> {
        Self::with_base_url(VOYAGE_API_URL.as_str(), session)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        session: SessionContext,
    ) -> Result<Self, GatewayError> {
        let base_url = base_url.into();
        tracing::debug!("Creating API gateway for {}", base_url);
        Ok(Self {
            client: get_client()?,
            base_url,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Issue a request and decode the JSON response.
    ///
    /// - 2xx: the body as JSON, `null` for an empty body.
    /// - 401: the session is evicted, [`SessionEvent::Expired`] is published and the
    ///   call returns `Ok(None)`.
    /// - other statuses: [`GatewayError::RequestRejected`] carrying the body's `message`.
    /// - transport and decode failures: logged, then returned.
    ///
    /// Calls are sent once; there is no retry.
    ///
    /// [`SessionEvent::Expired`]: crate::SessionEvent::Expired
    pub async fn request(&self, request: ApiRequest) -> Result<Option<Value>, GatewayError> {
        let url = build_url(&self.base_url, &request.endpoint, &request.query).map_err(
            |e| match e {
                UtilError::Format(msg) => GatewayError::InvalidEndpoint(msg),
                other => GatewayError::Utils(other),
            },
        )?;

        let (token, generation) = self.session.credentials().await;
        let headers = compose_headers(token.as_deref(), request.headers)?;

        tracing::debug!("{} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method.clone(), url.clone())
            .headers(headers);
        if let Some(body) = &request.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("API request error: {} {}: {}", request.method, url, e);
            GatewayError::Transport(e.to_string())
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("{} {} returned 401; ending session", request.method, url);
            self.session.expire(generation).await;
            return Ok(None);
        }

        let body = response.text().await.map_err(|e| {
            tracing::error!("API response error: {} {}: {}", request.method, url, e);
            GatewayError::Transport(e.to_string())
        })?;

        if !status.is_success() {
            let message =
                error_message(&body).unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());
            tracing::debug!(
                "{} {} rejected with {}: {}",
                request.method,
                url,
                status,
                message
            );
            return Err(GatewayError::RequestRejected {
                status: status.as_u16(),
                message,
            });
        }

        if body.trim().is_empty() {
            return Ok(Some(Value::Null));
        }

        serde_json::from_str(&body).map(Some).map_err(|e| {
            tracing::error!("API response parse error: {} {}: {}", request.method, url, e);
            GatewayError::Parse(e.to_string())
        })
    }
}

/// JSON content type first, caller headers over it, bearer token last.
fn compose_headers(token: Option<&str>, extra: HeaderMap) -> Result<HeaderMap, GatewayError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let mut last_name = None;
    for (name, value) in extra {
        // HeaderMap's owning iterator yields the name only on the first value of each header
        if let Some(name) = name {
            headers.remove(&name);
            last_name = Some(name);
        }
        if let Some(name) = &last_name {
            headers.append(name.clone(), value);
        }
    }

    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            GatewayError::InvalidRequest("Persisted token is not a valid header value".to_string())
        })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}

/// `message` field of a JSON error body, if there is a non-empty one
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("message")? {
        Value::String(message) if !message.is_empty() => Some(message.clone()),
        _ => None,
    }
}
