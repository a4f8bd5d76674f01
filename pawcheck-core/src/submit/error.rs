//! Submission error types.

use thiserror::Error;

/// Errors from the backend submission layer. This is the only layer
/// that propagates errors upward; the manager and store collapse
/// failures to boolean returns.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Server rejected {endpoint}: {message}")]
    Rejected {
        endpoint: &'static str,
        message: String,
    },

    #[error("Response is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Check-in has no pets; nothing to submit")]
    EmptyDocument,
}

impl From<reqwest::Error> for SubmitError {
    fn from(e: reqwest::Error) -> Self {
        SubmitError::Http(e.to_string())
    }
}
