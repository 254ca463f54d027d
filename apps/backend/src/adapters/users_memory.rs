//! In-memory user store for tests and local runs without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::errors::domain::DomainError;
use crate::repos::users::{UserRecord, UserStore};

#[derive(Debug, Clone)]
struct StoredUser {
    record: UserRecord,
    disabled: bool,
}

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, StoredUser>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the account keyed by its email.
    pub fn insert(&self, record: UserRecord, disabled: bool) {
        self.users
            .write()
            .insert(record.email.clone(), StoredUser { record, disabled });
    }

    pub fn set_disabled(&self, email: &str, disabled: bool) {
        if let Some(user) = self.users.write().get_mut(email) {
            user.disabled = disabled;
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_enabled_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserRecord>, DomainError> {
        Ok(self
            .users
            .read()
            .get(email)
            .filter(|u| !u.disabled)
            .map(|u| u.record.clone()))
    }
}
