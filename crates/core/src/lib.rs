//! `gatekeeper-core`: shared identifiers and the domain error model.
//!
//! This crate contains **pure domain** primitives (no transport or storage).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::UserId;
