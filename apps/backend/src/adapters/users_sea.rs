//! SeaORM adapter for the user store.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
};

use crate::entities::{roles, users};
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::repos::users::{UserRecord, UserStore};

/// Reads users and their role names from `users`/`roles`/`user_roles`.
#[derive(Debug, Clone)]
pub struct UserStoreSea {
    db: DatabaseConnection,
}

impl UserStoreSea {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn map_db_err(e: DbErr) -> DomainError {
    match e {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => {
            DomainError::infra(InfraErrorKind::DbUnavailable, e.to_string())
        }
        other => DomainError::infra(
            InfraErrorKind::Other("Database error".to_string()),
            format!("Failed to query user store: {other}"),
        ),
    }
}

#[async_trait]
impl UserStore for UserStoreSea {
    async fn find_enabled_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserRecord>, DomainError> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .filter(users::Column::Disabled.eq(false))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        let Some(user) = user else {
            return Ok(None);
        };

        let roles = user
            .find_related(roles::Entity)
            .order_by_asc(roles::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(Some(UserRecord {
            id: user.id,
            uuid: user.uuid,
            email: user.email,
            password_hash: user.password,
            roles: roles.into_iter().map(|r| r.name).collect(),
        }))
    }
}
