//! Identity and role claims embedded in issued tokens.

use serde::{Deserialize, Serialize};

/// Identity fields a token is issued for.
///
/// `roles` is passed through verbatim; the codec never enriches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub email: String,
    pub uuid: String,
    pub user_id: i64,
    pub roles: Vec<String>,
}

/// Claims carried inside a token.
///
/// Every field is required on decode, `roles` included: a token without a
/// role list is rejected rather than treated as "unchecked".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    pub email: String,
    pub uuid: String,
    pub user_id: i64,
    pub roles: Vec<String>,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
    /// Random per-token id, so two issues in the same second never collide.
    pub jti: String,
}

impl ClaimSet {
    pub fn subject(&self) -> Subject {
        Subject {
            email: self.email.clone(),
            uuid: self.uuid.clone(),
            user_id: self.user_id,
            roles: self.roles.clone(),
        }
    }

    /// Exact, case-sensitive role match. No hierarchy.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
