//! Error codes for the auth service API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that
//! appear in HTTP responses.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Bad credentials, disabled account or unknown user
    AuthenticationFailed,
    /// Token expired, tampered or otherwise unverifiable
    TokenInvalid,
    /// Missing or malformed token header
    MissingToken,
    /// Token is valid but lacks the required role
    InsufficientRole,

    // Request Validation
    /// Request fields missing or invalid
    InvalidRequest,
    /// Grant type discriminator not recognised
    UnsupportedGrantType,

    // System Errors
    /// Collaborator timed out or is unreachable
    ServiceUnavailable,
    /// Configuration error
    ConfigError,
    /// Internal server error
    Internal,
}

impl ErrorCode {
    /// Returns the canonical string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "AUTHENTICATION_FAILED",
            Self::TokenInvalid => "TOKEN_INVALID",
            Self::MissingToken => "MISSING_TOKEN",
            Self::InsufficientRole => "INSUFFICIENT_ROLE",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::UnsupportedGrantType => "UNSUPPORTED_GRANT_TYPE",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::ConfigError => "CONFIG_ERROR",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
