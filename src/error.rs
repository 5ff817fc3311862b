//! Error types for Parley
//!
//! This module defines the crate error type, the transport-derived error
//! taxonomy reported by the chat backend client, and the mapping from any
//! error to the single human-readable string shown in the error banner.

use thiserror::Error;

/// Shown when the backend answers HTTP 429
pub const RATE_LIMIT_MESSAGE: &str =
    "Rate limit exceeded. Please wait a moment before sending another message.";

/// Shown when the backend answers HTTP 400 without a `detail`
pub const BAD_REQUEST_MESSAGE: &str = "Invalid request.";

/// Shown when the backend answers HTTP 500
pub const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again later.";

/// Shown when the backend cannot be reached at all
pub const OFFLINE_MESSAGE: &str =
    "Cannot connect to the chatbot server. Please make sure the backend is running.";

/// Fallback for API errors carrying neither detail nor transport message
pub const GENERIC_API_MESSAGE: &str = "An error occurred.";

/// Fallback for errors that did not come from the backend client
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred.";

/// Main error type for Parley operations
#[derive(Error, Debug)]
pub enum ParleyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend client errors not tied to a single request
    #[error("Backend error: {0}")]
    Backend(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Line editor errors in interactive mode
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// Failure of a single backend request, classified by transport signal
///
/// The classification comes from the HTTP status code or the kind of
/// transport failure, never from custom error codes in the body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// HTTP 429
    #[error("Backend rate limit exceeded (HTTP 429)")]
    RateLimited,

    /// HTTP 400, with the backend's `detail` text if it sent one
    #[error("Backend rejected the request (HTTP 400): {}", .detail.as_deref().unwrap_or("no detail"))]
    BadRequest {
        /// `detail` field of the error body
        detail: Option<String>,
    },

    /// HTTP 500
    #[error("Backend internal error (HTTP 500)")]
    ServerError,

    /// The TCP connection to the backend could not be established
    #[error("Connection to backend refused: {0}")]
    ConnectionRefused(String),

    /// Any other status code or transport failure
    #[error("Backend request failed: {message}")]
    Other {
        /// HTTP status, absent for transport-level failures
        status: Option<u16>,
        /// `detail` field of the error body
        detail: Option<String>,
        /// Transport-level description of the failure
        message: String,
    },
}

impl ApiError {
    /// Human-readable message for the error banner
    ///
    /// # Examples
    ///
    /// ```
    /// use parley::error::{ApiError, RATE_LIMIT_MESSAGE};
    ///
    /// assert_eq!(ApiError::RateLimited.user_message(), RATE_LIMIT_MESSAGE);
    /// ```
    pub fn user_message(&self) -> String {
        match self {
            ApiError::RateLimited => RATE_LIMIT_MESSAGE.to_string(),
            ApiError::BadRequest { detail } => non_empty(detail.as_deref())
                .unwrap_or(BAD_REQUEST_MESSAGE)
                .to_string(),
            ApiError::ServerError => SERVER_ERROR_MESSAGE.to_string(),
            ApiError::ConnectionRefused(_) => OFFLINE_MESSAGE.to_string(),
            ApiError::Other {
                detail, message, ..
            } => non_empty(detail.as_deref())
                .or_else(|| non_empty(Some(message.as_str())))
                .unwrap_or(GENERIC_API_MESSAGE)
                .to_string(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Convert any error into the string shown to the user
///
/// Walks the error chain looking for an [`ApiError`], so context added
/// with `anyhow::Context` does not hide the classification.
///
/// # Examples
///
/// ```
/// use parley::error::{describe_error, ApiError, SERVER_ERROR_MESSAGE, UNEXPECTED_MESSAGE};
///
/// let err = anyhow::Error::from(ApiError::ServerError);
/// assert_eq!(describe_error(&err), SERVER_ERROR_MESSAGE);
///
/// let err = anyhow::anyhow!("something else");
/// assert_eq!(describe_error(&err), UNEXPECTED_MESSAGE);
/// ```
pub fn describe_error(error: &anyhow::Error) -> String {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<ApiError>())
        .map(ApiError::user_message)
        .unwrap_or_else(|| UNEXPECTED_MESSAGE.to_string())
}

/// Result type alias for Parley operations
///
/// Uses `anyhow::Error` so callers can attach context while the
/// [`ApiError`] classification stays recoverable through [`describe_error`].
pub type Result<T> = anyhow::Result<T>;
