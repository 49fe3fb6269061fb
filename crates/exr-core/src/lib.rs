//! # exr-core
//!
//! Core types and error types for the exr expense client.
//!
//! This crate provides the foundational types shared across all exr crates:
//! - Entity structs for the expense form, receipt submission, and server replies
//! - The closed expense category enum
//! - The receipt capture stage machine
//! - Cross-cutting error types
//! - Lightweight authenticated identity

pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;

pub use errors::CoreError;
