//! Adapter-internal error type.
//!
//! Everything is flattened into [`pipeline::HostError`] at the trait boundary;
//! the HTTP status is preserved so the orchestration layer can classify it.

use pipeline::HostError;
use thiserror::Error;

/// Failures inside the GitHub adapter.
#[derive(Debug, Error)]
pub enum GithubError {
    /// Transport-level failure (DNS, TLS, connection, body decoding).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// GitHub answered with a non-success status.
    #[error("GitHub API returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// The `message` field of the error body, or the raw body.
        message: String,
    },

    /// The configured base URL cannot carry path segments.
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// A required field was empty or absent in a response.
    #[error("response field '{0}' is missing or empty")]
    MissingField(&'static str),

    /// The contents API reported an entry type this client does not know.
    #[error("unknown content entry type '{0}'")]
    UnknownEntryKind(String),

    /// A response had the wrong shape (e.g. a listing where a file was expected).
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl From<GithubError> for HostError {
    fn from(error: GithubError) -> Self {
        match error {
            GithubError::Api { status, message } => HostError::with_status(status, message),
            GithubError::Http(ref e) => match e.status() {
                Some(status) => HostError::with_status(status.as_u16(), error.to_string()),
                None => HostError::transport(error.to_string()),
            },
            other => HostError::transport(other.to_string()),
        }
    }
}
