//! Domain-level error type used by the token lifecycle core.
//!
//! This error type is HTTP- and DB-agnostic. Handlers return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.

use thiserror::Error;

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    DbUnavailable,
    SecretSource,
    Other(String),
}

/// Central domain error type.
///
/// The first four variants are terminal rejections handed back to the
/// caller. `Infra` covers operational failures of collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Request fields missing or of the wrong shape
    #[error("malformed input: {0}")]
    MalformedInput(String),
    /// Unknown user, disabled account or wrong password; deliberately uniform
    #[error("authentication failed")]
    AuthenticationFailed,
    /// Expired, tampered, malformed or foreign-secret token; deliberately uniform
    #[error("token invalid")]
    TokenInvalid,
    /// Grant type discriminator not recognised
    #[error("unsupported grant type: {0}")]
    UnsupportedGrant(String),
    /// Infrastructure/operational failures
    #[error("infra {0:?}: {1}")]
    Infra(InfraErrorKind, String),
}

impl DomainError {
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedInput(detail.into())
    }

    pub fn unsupported_grant(grant_type: impl Into<String>) -> Self {
        Self::UnsupportedGrant(grant_type.into())
    }

    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }
}
