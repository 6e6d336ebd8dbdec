//! Foundation module - Shared domain primitives.
//!
//! Contains the error vocabulary shared by every other domain module.

mod errors;

pub use errors::{DomainError, ErrorCode, ValidationError};
