//! Expense submission endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EndpointsConfig {
    /// Travel/expense form endpoint (`API_ENDPOINT` in the mobile client's `.env`).
    #[serde(default)]
    pub form_url: String,

    /// Receipt image upload endpoint (`IMAGE_UPLOAD_ENDPOINT`).
    #[serde(default)]
    pub receipt_url: String,
}

impl EndpointsConfig {
    pub fn is_form_configured(&self) -> bool {
        !self.form_url.trim().is_empty()
    }

    pub fn is_receipt_configured(&self) -> bool {
        !self.receipt_url.trim().is_empty()
    }
}
