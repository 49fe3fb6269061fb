//! Submission error types.

use exr_auth::AuthError;
use exr_core::CoreError;
use thiserror::Error;

/// Errors that can occur while encoding or submitting an expense.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// HTTP transport error (connection refused, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("request rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// The endpoint's `message` field, or the raw body.
        message: String,
    },

    /// The user's input failed local validation. Nothing was sent.
    #[error(transparent)]
    Input(#[from] CoreError),

    /// No usable session.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The picked asset has no file name or its bytes could not be read.
    #[error("Image data is incomplete.")]
    IncompleteImage,

    /// The picked file is not a recognised image format.
    #[error("{path} is not an image (detected {detected})")]
    NotAnImage { path: String, detected: String },

    /// Failed to parse a success response.
    #[error("parse error: {0}")]
    Parse(String),
}

impl SubmitError {
    /// True when the failure happened before any request was made.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Input(_) | Self::Auth(_) | Self::IncompleteImage | Self::NotAnImage { .. }
        )
    }
}
