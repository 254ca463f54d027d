use std::sync::Arc;

use tracing::warn;

use crate::adapters::users_sea::UserStoreSea;
use crate::auth::clock::{Clock, SystemClock};
use crate::auth::jwt::TokenCodec;
use crate::auth::password::warm_dummy_hash;
use crate::auth::secret_store::{OsRandomSecretSource, SecretSource, SecretStore, SigningSecret};
use crate::config::auth::AuthConfig;
use crate::config::db::DbConfig;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::repos::users::UserStore;
use crate::services::auth_flow::AuthFlow;
use crate::state::app_state::AppState;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    auth_config: AuthConfig,
    db_config: Option<DbConfig>,
    users: Option<Arc<dyn UserStore>>,
    clock: Arc<dyn Clock>,
    secret_source: Arc<dyn SecretSource>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            auth_config: AuthConfig::default(),
            db_config: None,
            users: None,
            clock: Arc::new(SystemClock),
            secret_source: Arc::new(OsRandomSecretSource),
        }
    }

    pub fn with_auth_config(mut self, config: AuthConfig) -> Self {
        self.auth_config = config;
        self
    }

    /// Back the user store with a migrated database.
    pub fn with_db(mut self, config: DbConfig) -> Self {
        self.db_config = Some(config);
        self
    }

    /// Use an explicit user store; takes precedence over `with_db`.
    pub fn with_user_store(mut self, users: Arc<dyn UserStore>) -> Self {
        self.users = Some(users);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_secret_source(mut self, source: Arc<dyn SecretSource>) -> Self {
        self.secret_source = source;
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let users: Arc<dyn UserStore> = match (self.users, self.db_config) {
            (Some(users), _) => users,
            (None, Some(db_config)) => {
                // single entrypoint: connect + migrate
                let conn = bootstrap_db(&db_config).await?;
                Arc::new(UserStoreSea::new(conn))
            }
            (None, None) => {
                return Err(AppError::config(
                    "no user store configured; call with_db or with_user_store",
                ))
            }
        };

        if !tokio::task::spawn_blocking(warm_dummy_hash)
            .await
            .unwrap_or(false)
        {
            warn!("dummy password hash unavailable; absent-user logins are not timing-equalised");
        }

        let secrets = match &self.auth_config.secret_seed {
            Some(seed) => SecretStore::new(SigningSecret::new(seed.clone()), self.secret_source),
            None => SecretStore::generate(self.secret_source)?,
        };
        let secrets = Arc::new(secrets);

        let codec = TokenCodec::new(Arc::clone(&secrets), self.clock);
        let auth = Arc::new(AuthFlow::new(users, codec, &self.auth_config));

        Ok(AppState::new(auth, secrets))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
