//! User store contract consumed by the login flow.
//!
//! The relational schema belongs to the user-management side of the system;
//! the auth core only ever reads through this trait.

use async_trait::async_trait;

use crate::errors::domain::DomainError;

/// Credential and identity data for an enabled account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i64,
    pub uuid: String,
    pub email: String,
    pub password_hash: String,
    /// Role names in the store's order.
    pub roles: Vec<String>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Enabled user with this email, or `None`. Disabled accounts are
    /// indistinguishable from absent ones.
    async fn find_enabled_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserRecord>, DomainError>;
}
