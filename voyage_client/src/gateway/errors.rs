use thiserror::Error;

use crate::utils::UtilError;

/// Message used when a rejected request carries no backend-provided message
pub(crate) const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong";

/// Failures surfaced by gateway calls.
///
/// An HTTP 401 is not represented here: it evicts the session and the call returns
/// `Ok(None)`.
#[derive(Debug, Error, Clone)]
pub enum GatewayError {
    /// Non-2xx response other than 401
    #[error("{message}")]
    RequestRejected { status: u16, message: String },

    /// The request never produced a response (connection refused, DNS, timeout, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// A successful response whose body is not valid JSON
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Rejected before sending, e.g. incomplete search criteria
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Serde error: {0}")]
    Serde(String),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}

impl GatewayError {
    /// Text a page displays inline for this failure
    pub fn message(&self) -> String {
        match self {
            Self::RequestRejected { message, .. } if !message.is_empty() => message.clone(),
            Self::RequestRejected { .. } => DEFAULT_ERROR_MESSAGE.to_string(),
            Self::InvalidRequest(message) => message.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status of a rejected request
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestRejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}
