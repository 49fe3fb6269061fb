//! Entities sent to and received from the expense endpoints.

mod expense_form;
mod receipt;

pub use expense_form::{ExpenseFormInput, ExpenseFormPayload, FormReceipt, TravelFlag};
pub use receipt::{ReceiptMetadata, ReceiptSubmission, UploadResult, validate_price};
