use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use blue_auth::adapters::users_memory::InMemoryUserStore;
use blue_auth::auth::clock::ManualClock;
use blue_auth::auth::password::hash_password;
use blue_auth::config::auth::AuthConfig;
use blue_auth::infra::state::build_state;
use blue_auth::repos::users::UserRecord;
use blue_auth::state::app_state::AppState;

pub const ADMIN_EMAIL: &str = "admin@blue.io";
pub const VIEWER_EMAIL: &str = "viewer@blue.io";
pub const DISABLED_EMAIL: &str = "gone@blue.io";
pub const PASSWORD: &str = "correct horse";

// Lowest bcrypt cost keeps the suite fast.
const TEST_BCRYPT_COST: u32 = 4;

pub struct TestEnv {
    pub state: AppState,
    pub clock: Arc<ManualClock>,
    pub users: Arc<InMemoryUserStore>,
}

fn record(id: i64, email: &str, roles: &[&str]) -> UserRecord {
    UserRecord {
        id,
        uuid: format!("00000000-0000-4000-8000-{id:012}"),
        email: email.to_string(),
        password_hash: hash_password(PASSWORD, TEST_BCRYPT_COST).expect("hash test password"),
        roles: roles.iter().map(|r| r.to_string()).collect(),
    }
}

/// In-memory users, a manual clock and default token lifetimes.
pub async fn test_env() -> TestEnv {
    test_env_with(AuthConfig::default()).await
}

pub async fn test_env_with(config: AuthConfig) -> TestEnv {
    let users = Arc::new(InMemoryUserStore::new());
    users.insert(record(1, ADMIN_EMAIL, &["admin"]), false);
    users.insert(record(2, VIEWER_EMAIL, &[]), false);
    users.insert(record(3, DISABLED_EMAIL, &["admin"]), true);

    let clock = Arc::new(ManualClock::new(
        UNIX_EPOCH + Duration::from_secs(1_750_000_000),
    ));

    let state = build_state()
        .with_auth_config(config)
        .with_user_store(users.clone())
        .with_clock(clock.clone())
        .build()
        .await
        .expect("build test state");

    TestEnv {
        state,
        clock,
        users,
    }
}
