//! Error types for the insight client.
//!
//! None of these reach the operator: the service logs them and shows the
//! fallback insight instead.

use thiserror::Error;

/// Errors that can occur when calling the generative model.
#[derive(Debug, Error)]
pub enum InsightError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned an error body.
    #[error("API error ({status}): {message}")]
    Api {
        /// Status string from the API (e.g. INVALID_ARGUMENT).
        status: String,
        /// Error message.
        message: String,
    },

    /// Rate limited by the API.
    #[error("rate limited")]
    RateLimited,

    /// Credential rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The API key cannot be sent as a header value.
    #[error("invalid API key: {0}")]
    InvalidKey(String),

    /// Response had no candidate text.
    #[error("empty response")]
    EmptyResponse,

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Error body returned by the Generative Language API.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}
