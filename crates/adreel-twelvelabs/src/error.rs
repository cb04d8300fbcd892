//! TwelveLabs error types.

use thiserror::Error;

/// Result type for TwelveLabs operations.
pub type TwelveLabsResult<T> = Result<T, TwelveLabsError>;

/// Errors that can occur when talking to TwelveLabs.
#[derive(Debug, Error)]
pub enum TwelveLabsError {
    #[error("TL_API_KEY environment variable is required")]
    MissingApiKey,

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited by TwelveLabs")]
    RateLimited,

    #[error("HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TwelveLabsError {
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Map a non-success HTTP status onto an error variant.
    pub fn from_http_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            401 | 403 => Self::AuthError(body),
            404 => Self::NotFound(body),
            429 => Self::RateLimited,
            _ => Self::Api { status, body },
        }
    }

    /// HTTP status associated with the error, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::AuthError(_) => Some(401),
            Self::NotFound(_) => Some(404),
            Self::RateLimited => Some(429),
            Self::Api { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the provider could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Network(e) if e.is_connect() || e.is_timeout())
    }
}
