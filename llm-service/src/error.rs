//! Unified error type for the crate.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors produced by [`crate::OllamaService`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LlmError {
    /// The endpoint is empty or does not start with http/https.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Transport/HTTP client error.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-successful HTTP status from upstream.
    #[error("unexpected HTTP status {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Short snippet of the response body (trimmed).
        snippet: String,
    },

    /// Unexpected/invalid JSON response.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Result alias for LLM operations.
pub type Result<T> = std::result::Result<T, LlmError>;
