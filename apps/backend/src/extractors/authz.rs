use crate::auth::claims::ClaimSet;
use crate::error::AppError;
use crate::errors::ErrorCode;

/// Allow the request only when the verified claims carry `role` exactly.
///
/// Claims with an empty role list never pass.
pub fn require_role(claims: &ClaimSet, role: &str) -> Result<(), AppError> {
    if claims.has_role(role) {
        return Ok(());
    }
    Err(AppError::forbidden(
        ErrorCode::InsufficientRole,
        format!("Role '{role}' is required"),
    ))
}
