// Unit tests for error mapping - pure domain logic without HTTP or database dependencies
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::errors::ErrorCode;
use crate::AppError;

fn mapped(de: DomainError) -> (u16, ErrorCode) {
    let app: AppError = de.into();
    (app.status().as_u16(), app.code())
}

#[test]
fn maps_rejections() {
    assert_eq!(
        mapped(DomainError::malformed("email is required")),
        (400, ErrorCode::InvalidRequest)
    );
    assert_eq!(
        mapped(DomainError::AuthenticationFailed),
        (401, ErrorCode::AuthenticationFailed)
    );
    assert_eq!(mapped(DomainError::TokenInvalid), (401, ErrorCode::TokenInvalid));
    assert_eq!(
        mapped(DomainError::unsupported_grant("implicit")),
        (400, ErrorCode::UnsupportedGrantType)
    );
}

#[test]
fn maps_operational_failures() {
    assert_eq!(
        mapped(DomainError::infra(InfraErrorKind::Timeout, "slow")),
        (503, ErrorCode::ServiceUnavailable)
    );
    assert_eq!(
        mapped(DomainError::infra(InfraErrorKind::DbUnavailable, "down")),
        (503, ErrorCode::ServiceUnavailable)
    );
    assert_eq!(
        mapped(DomainError::infra(InfraErrorKind::SecretSource, "rng")),
        (500, ErrorCode::Internal)
    );
    assert_eq!(
        mapped(DomainError::infra(InfraErrorKind::Other("x".into()), "y")),
        (500, ErrorCode::Internal)
    );
}

#[test]
fn malformed_detail_reaches_the_client() {
    let app: AppError = DomainError::malformed("token is required").into();
    assert!(app.to_string().contains("token is required"));
}
