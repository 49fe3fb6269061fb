pub mod auth;
pub mod form;
pub mod receipt;

pub use auth::{AuthCommands, CredentialArgs};
pub use form::FormCommands;
pub use receipt::ReceiptCommands;
