//! Cross-cutting error types for exr.
//!
//! Transport and provider errors live in their own crates (`AuthError` in
//! `exr-auth`, `SubmitError` in `exr-submit`). The variants here are raised
//! before any request is made.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A required field was empty; the submission was blocked locally.
    #[error("missing required field: {field}")]
    InputIncomplete { field: &'static str },

    /// Data failed a local format check.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A stage transition was attempted that the receipt flow does not allow.
    #[error("Invalid state transition: from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}
