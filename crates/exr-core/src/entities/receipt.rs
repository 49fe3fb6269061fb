use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ExpenseCategory;
use crate::errors::CoreError;

/// Metadata typed on the receipt form: date, price, and category.
///
/// Survives failed submissions so the user can retry without re-entering it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiptMetadata {
    /// `YYYY-MM-DD`, defaulted to today when the form opens.
    pub date: String,
    /// Numeric text as typed.
    pub price: String,
    pub category: Option<ExpenseCategory>,
}

impl ReceiptMetadata {
    /// Check the metadata is complete and the price is a non-negative number.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InputIncomplete`] for an empty field and
    /// [`CoreError::Validation`] for a price that is not numeric.
    pub fn validate(&self) -> Result<ExpenseCategory, CoreError> {
        if self.date.trim().is_empty() {
            return Err(CoreError::InputIncomplete { field: "date" });
        }
        validate_price(&self.price)?;
        self.category
            .ok_or(CoreError::InputIncomplete { field: "category" })
    }
}

/// Accept numeric text such as `12`, `12.50`, or `0.99`.
///
/// # Errors
///
/// Returns [`CoreError::InputIncomplete`] for blank input and
/// [`CoreError::Validation`] for anything that is not a finite, non-negative number.
pub fn validate_price(price: &str) -> Result<f64, CoreError> {
    let trimmed = price.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InputIncomplete { field: "price" });
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(CoreError::Validation(format!(
            "price must be a non-negative number, got '{trimmed}'"
        ))),
    }
}

/// JSON body posted to the receipt upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptSubmission {
    /// Base64 image content, standard alphabet, no data-URL prefix.
    #[serde(rename = "imageData")]
    pub image_base64: String,
    pub file_name: String,
    pub user_id: String,
    pub date: String,
    pub price: String,
    pub category: ExpenseCategory,
}

impl ReceiptSubmission {
    /// Assemble a submission from an encoded image and validated metadata.
    ///
    /// # Errors
    ///
    /// Propagates [`ReceiptMetadata::validate`] failures, and returns
    /// [`CoreError::InputIncomplete`] if the user id or file name is empty.
    pub fn new(
        image_base64: String,
        file_name: &str,
        user_id: &str,
        metadata: &ReceiptMetadata,
    ) -> Result<Self, CoreError> {
        let category = metadata.validate()?;
        if file_name.trim().is_empty() {
            return Err(CoreError::InputIncomplete { field: "fileName" });
        }
        if user_id.trim().is_empty() {
            return Err(CoreError::InputIncomplete { field: "userId" });
        }
        Ok(Self {
            image_base64,
            file_name: file_name.to_string(),
            user_id: user_id.to_string(),
            date: metadata.date.trim().to_string(),
            price: metadata.price.trim().to_string(),
            category,
        })
    }
}

/// Upload endpoint reply on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UploadResult {
    /// Time-limited direct URL to the stored receipt image.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
