//! # exr-submit
//!
//! Clients for the two expense endpoints: the travel expense form and the
//! receipt image upload. Both post JSON with the session's bearer token.

mod client;
mod encode;
mod error;
mod http;

pub use client::SubmissionClient;
pub use encode::{EncodedImage, encode_image};
pub use error::SubmitError;
