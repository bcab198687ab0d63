//! commercetools client errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when talking to the commercetools API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error: {0}")]
    Api(ErrorResponse),

    /// Obtaining an access token failed.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// A success response could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ClientError {
    /// HTTP status of an API error, if this is one.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(response) => Some(response.status_code),
            _ => None,
        }
    }

    /// Returns `true` for a 404 API response.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.status_code(), Some(404))
    }

    /// The structured error body, if the server sent one.
    #[must_use]
    pub const fn response(&self) -> Option<&ErrorResponse> {
        match self {
            Self::Api(response) => Some(response),
            _ => None,
        }
    }
}

/// Error body returned by the commercetools API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Summary message.
    pub message: String,
    /// Individual errors; each may carry extra fields depending on its code.
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

impl ErrorResponse {
    /// Create an error response without detail entries.
    #[must_use]
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Append a detail entry.
    #[must_use]
    pub fn with_error(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.errors.push(ApiError {
            code: code.into(),
            message: message.into(),
            extra: serde_json::Map::new(),
        });
        self
    }

    /// Render every detail entry, including code-specific extra fields.
    ///
    /// Returns an empty string when there are no entries.
    #[must_use]
    pub fn format_extras(&self) -> String {
        self.errors
            .iter()
            .map(ApiError::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.status_code, self.message)
    }
}

/// One entry of [`ErrorResponse::errors`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// Machine-readable error code (e.g. `ConcurrentModification`).
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Code-specific fields such as `currentVersion` or `field`.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if !self.extra.is_empty() {
            let extras = self
                .extra
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, " ({extras})")?;
        }
        Ok(())
    }
}
