//! Shared HTTP response helpers for the expense endpoints.

use serde::Deserialize;

use crate::error::SubmitError;

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Pass a success response through, or turn it into [`SubmitError::Rejected`].
///
/// The upload function answers failures with `{"message": "..."}`; when the
/// body has that shape the message is kept, otherwise the raw body is.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, SubmitError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(SubmitError::Rejected {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message.or(parsed.error))
        .unwrap_or_else(|| body.trim().to_string())
}
