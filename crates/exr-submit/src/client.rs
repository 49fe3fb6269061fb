//! HTTP client for the expense form and receipt upload endpoints.

use std::time::Duration;

use exr_auth::Session;
use exr_core::entities::{ExpenseFormInput, FormReceipt, ReceiptSubmission, UploadResult};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;

use crate::error::SubmitError;
use crate::http::check_response;

/// Posts expense data to the configured endpoints on behalf of a session.
///
/// Each call is a single round trip with the session's bearer token. No
/// retries; a failed call leaves the caller's state untouched.
#[derive(Debug, Clone)]
pub struct SubmissionClient {
    http: reqwest::Client,
}

impl SubmissionClient {
    /// # Errors
    ///
    /// Returns [`SubmitError::Http`] if the HTTP client cannot be built.
    pub fn new(timeout: Option<Duration>) -> Result<Self, SubmitError> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            "exr/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }

    /// Validate `input` and post it to the form endpoint.
    ///
    /// Validation and the session check happen before any network traffic.
    ///
    /// # Errors
    ///
    /// - [`SubmitError::Input`] if a required field is empty.
    /// - [`SubmitError::Auth`] if the session holds no token.
    /// - [`SubmitError::Rejected`] / [`SubmitError::Http`] if the endpoint or transport fails.
    pub async fn submit_expense_form(
        &self,
        url: &str,
        session: &Session,
        input: &ExpenseFormInput,
    ) -> Result<FormReceipt, SubmitError> {
        let payload = input.to_payload()?;
        let bearer = session.bearer()?;

        let resp = self.post_json(url, &bearer, &payload).await?;
        let body = resp.text().await?;
        let receipt = FormReceipt::from_body(&body);
        tracing::info!(
            download_url = receipt.download_url.as_deref().unwrap_or("-"),
            "expense form accepted"
        );
        Ok(receipt)
    }

    /// Post a receipt with its inline image to the upload endpoint.
    ///
    /// # Errors
    ///
    /// - [`SubmitError::Auth`] if the session holds no token.
    /// - [`SubmitError::Rejected`] with the endpoint's message on a non-2xx reply.
    /// - [`SubmitError::Parse`] if a 2xx reply carries no `url`.
    pub async fn upload_receipt(
        &self,
        url: &str,
        session: &Session,
        submission: &ReceiptSubmission,
    ) -> Result<UploadResult, SubmitError> {
        let bearer = session.bearer()?;

        let resp = self.post_json(url, &bearer, submission).await?;
        let body = resp.text().await?;
        let result: UploadResult = serde_json::from_str(&body)
            .map_err(|e| SubmitError::Parse(format!("upload response: {e}")))?;
        tracing::info!(file_name = %submission.file_name, url = %result.url, "receipt uploaded");
        Ok(result)
    }

    async fn post_json<T: Serialize + Sync>(
        &self,
        url: &str,
        bearer: &str,
        body: &T,
    ) -> Result<reqwest::Response, SubmitError> {
        tracing::debug!(%url, "posting expense payload");
        let resp = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, bearer)
            .json(body)
            .send()
            .await?;
        check_response(resp).await
    }
}
