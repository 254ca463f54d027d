//! Error handling for the auth service.

pub mod domain;
pub mod error_code;

pub use domain::{DomainError, InfraErrorKind};
pub use error_code::ErrorCode;

#[cfg(test)]
mod tests_error_mapping;
