//! API-specific error types
//!
//! Every failure path of the façade ends in one of these variants. Server
//! error responses are kept verbatim (status, URL, body) so the presentation
//! layer can render the backend's own messages.

use std::collections::BTreeMap;
use std::fmt;

use maintrack_common::TokenStoreError;
use maintrack_domain::MaintrackError;
use reqwest::StatusCode;
use thiserror::Error;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// 401/403, or the session could not be refreshed
    Authentication,
    /// 400 with field-level messages
    Validation,
    /// 404
    NotFound,
    /// 429
    RateLimit,
    /// 5xx
    Server,
    /// Other 4xx, or a request the client could not build
    Client,
    /// Transport failure or unreadable response
    Network,
    /// Configuration or local storage problems
    Local,
}

/// Non-2xx response as received from the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: u16,
    pub url: String,
    pub body: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self { status: status.as_u16(), url: url.into(), body: body.into() }
    }

    /// Field → messages map from a DRF-style validation body
    /// (`{"titulo": ["Título deve ter pelo menos 5 caracteres."]}`).
    ///
    /// Returns an empty map when the body is not a JSON object.
    pub fn field_errors(&self) -> BTreeMap<String, Vec<String>> {
        let Ok(serde_json::Value::Object(map)) = serde_json::from_str(&self.body) else {
            return BTreeMap::new();
        };

        map.into_iter()
            .map(|(field, value)| {
                let messages = match value {
                    serde_json::Value::Array(items) => items.into_iter().map(value_text).collect(),
                    other => vec![value_text(other)],
                };
                (field, messages)
            })
            .collect()
    }

    /// Single human-readable message, when the backend sent one
    /// (`detail`, `erro` or `non_field_errors`).
    pub fn message(&self) -> Option<String> {
        let fields = self.field_errors();
        ["detail", "erro", "non_field_errors"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(|messages| messages.first().cloned()))
    }
}

fn value_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text,
        other => other.to_string(),
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.body.is_empty() {
            write!(f, "{} returned status {}", self.url, self.status)
        } else {
            write!(f, "{} returned status {}: {}", self.url, self.status, self.body)
        }
    }
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(ErrorResponse),

    #[error("Forbidden: {0}")]
    Forbidden(ErrorResponse),

    /// Refresh credential missing or rejected; credentials were cleared
    #[error("Session expired: {0}")]
    SessionExpired(String),

    #[error("Validation failed: {0}")]
    Validation(ErrorResponse),

    #[error("Not found: {0}")]
    NotFound(ErrorResponse),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(ErrorResponse),

    #[error("Server error: {0}")]
    Server(ErrorResponse),

    #[error("Client error: {0}")]
    Client(ErrorResponse),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Credential storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Classify a non-2xx response.
    pub fn from_status(status: StatusCode, url: &str, body: String) -> Self {
        let response = ErrorResponse::new(status, url, body);

        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized(response),
            StatusCode::FORBIDDEN => Self::Forbidden(response),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                Self::Validation(response)
            }
            StatusCode::NOT_FOUND => Self::NotFound(response),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimit(response),
            s if s.is_server_error() => Self::Server(response),
            _ => Self::Client(response),
        }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Unauthorized(_) | Self::Forbidden(_) | Self::SessionExpired(_) => {
                ApiErrorCategory::Authentication
            }
            Self::Validation(_) => ApiErrorCategory::Validation,
            Self::NotFound(_) => ApiErrorCategory::NotFound,
            Self::RateLimit(_) => ApiErrorCategory::RateLimit,
            Self::Server(_) => ApiErrorCategory::Server,
            Self::Client(_) | Self::InvalidRequest(_) => ApiErrorCategory::Client,
            Self::Network(_) | Self::Decode(_) => ApiErrorCategory::Network,
            Self::Storage(_) | Self::Config(_) => ApiErrorCategory::Local,
        }
    }

    /// The server response behind this error, if there was one.
    pub fn response(&self) -> Option<&ErrorResponse> {
        match self {
            Self::Unauthorized(r)
            | Self::Forbidden(r)
            | Self::Validation(r)
            | Self::NotFound(r)
            | Self::RateLimit(r)
            | Self::Server(r)
            | Self::Client(r) => Some(r),
            _ => None,
        }
    }

    /// HTTP status code, if the server answered.
    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired(_))
    }
}

impl From<MaintrackError> for ApiError {
    fn from(err: MaintrackError) -> Self {
        match err {
            MaintrackError::Network(message) => Self::Network(message),
            MaintrackError::Config(message) => Self::Config(message),
            MaintrackError::Storage(message) => Self::Storage(message),
            MaintrackError::InvalidInput(message) => Self::InvalidRequest(message),
            MaintrackError::Internal(message) => Self::Network(message),
        }
    }
}

impl From<TokenStoreError> for ApiError {
    fn from(err: TokenStoreError) -> Self {
        Self::Storage(err.to_string())
    }
}
