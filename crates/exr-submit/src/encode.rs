//! Image encoding for receipt uploads.
//!
//! The file is read once and encoded in memory with the standard base64
//! alphabet (padded, no data-URL prefix). Only formats `infer` classifies as
//! images are accepted.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::SubmitError;

/// A picked image ready to be embedded in a [`exr_core::entities::ReceiptSubmission`].
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub file_name: String,
    pub mime: &'static str,
    /// Extension of the detected format, e.g. `png`.
    pub extension: &'static str,
    pub base64: String,
}

impl EncodedImage {
    /// Rename to `<stem>.<detected extension>`, for files named before
    /// their content was known.
    #[must_use]
    pub fn with_detected_extension(mut self) -> Self {
        let stem = Path::new(&self.file_name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("receipt")
            .to_string();
        self.file_name = format!("{stem}.{}", self.extension);
        self
    }
}

impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedImage")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("base64_len", &self.base64.len())
            .finish()
    }
}

/// Read and encode the image at `path`.
///
/// # Errors
///
/// - [`SubmitError::IncompleteImage`] if the path has no file name, the file
///   cannot be read, or it is empty.
/// - [`SubmitError::NotAnImage`] if the content is not a known image format.
pub async fn encode_image(path: &Path) -> Result<EncodedImage, SubmitError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .ok_or(SubmitError::IncompleteImage)?
        .to_string();

    let bytes = tokio::fs::read(path).await.map_err(|error| {
        tracing::warn!(path = %path.display(), %error, "failed to read picked image");
        SubmitError::IncompleteImage
    })?;
    if bytes.is_empty() {
        return Err(SubmitError::IncompleteImage);
    }

    encode_bytes(file_name, &bytes).map_err(|detected| SubmitError::NotAnImage {
        path: path.display().to_string(),
        detected,
    })
}

fn encode_bytes(file_name: String, bytes: &[u8]) -> Result<EncodedImage, String> {
    let kind = infer::get(bytes);
    match kind {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Image => {
            tracing::debug!(%file_name, mime = kind.mime_type(), size = bytes.len(), "encoded image");
            Ok(EncodedImage {
                file_name,
                mime: kind.mime_type(),
                extension: kind.extension(),
                base64: STANDARD.encode(bytes),
            })
        }
        Some(kind) => Err(kind.mime_type().to_string()),
        None => Err("unknown".to_string()),
    }
}
