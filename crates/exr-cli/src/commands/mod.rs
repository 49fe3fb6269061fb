pub mod auth;
mod dispatch;
pub mod form;
pub mod receipt;
pub mod schema;
mod session;
pub mod shell;

pub use dispatch::dispatch;
