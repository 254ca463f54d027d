//! Token lifecycle settings read from the environment.
//!
//! | Variable | Unit | Default |
//! |---|---|---|
//! | `JWT_SALT_LIFE_TIME` | minutes between secret rotations | 60 |
//! | `JWT_SECRET` | initial secret seed | random |
//! | `ACCESS_TOKEN_TTL_MINUTES` | minutes | 60 |
//! | `REFRESH_TOKEN_TTL_MINUTES` | minutes | 65 |
//! | `USER_LOOKUP_TIMEOUT_MS` | milliseconds | 5000 |

use std::fmt;
use std::time::Duration;

use crate::error::AppError;

const MINUTE: u64 = 60;
/// A century; keeps `iat + ttl` and `Instant + interval` far from overflow.
const MAX_MINUTES: u64 = 100 * 366 * 24 * 60;

#[derive(Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub rotation_interval: Duration,
    /// Initial signing secret; `None` means generate one at startup.
    pub secret_seed: Option<Vec<u8>>,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub user_lookup_timeout: Duration,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("rotation_interval", &self.rotation_interval)
            .field("secret_seed", &self.secret_seed.as_ref().map(|_| "<set>"))
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("user_lookup_timeout", &self.user_lookup_timeout)
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            rotation_interval: Duration::from_secs(60 * MINUTE),
            secret_seed: None,
            access_ttl: Duration::from_secs(60 * MINUTE),
            refresh_ttl: Duration::from_secs(65 * MINUTE),
            user_lookup_timeout: Duration::from_millis(5_000),
        }
    }
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(super::env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let rotation_interval = minutes(&lookup, "JWT_SALT_LIFE_TIME")?
            .unwrap_or(defaults.rotation_interval);
        let access_ttl = minutes(&lookup, "ACCESS_TOKEN_TTL_MINUTES")?
            .unwrap_or(defaults.access_ttl);
        let refresh_ttl = minutes(&lookup, "REFRESH_TOKEN_TTL_MINUTES")?
            .unwrap_or(defaults.refresh_ttl);
        let user_lookup_timeout = positive(&lookup, "USER_LOOKUP_TIMEOUT_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.user_lookup_timeout);

        let secret_seed = match lookup("JWT_SECRET") {
            None => None,
            Some(s) if s.is_empty() => {
                return Err(AppError::config("JWT_SECRET is set but empty"));
            }
            Some(s) => Some(s.into_bytes()),
        };

        if refresh_ttl <= access_ttl {
            tracing::warn!(
                access_ttl_secs = access_ttl.as_secs(),
                refresh_ttl_secs = refresh_ttl.as_secs(),
                "refresh token ttl does not exceed access token ttl"
            );
        }

        Ok(Self {
            rotation_interval,
            secret_seed,
            access_ttl,
            refresh_ttl,
            user_lookup_timeout,
        })
    }
}

/// Optional minute count in `1..=MAX_MINUTES`.
fn minutes<F>(lookup: &F, key: &str) -> Result<Option<Duration>, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match positive(lookup, key)? {
        None => Ok(None),
        Some(m) if m <= MAX_MINUTES => Ok(m.checked_mul(MINUTE).map(Duration::from_secs)),
        Some(m) => Err(AppError::config(format!(
            "{key} must be at most {MAX_MINUTES} minutes, got {m}"
        ))),
    }
}

/// Optional strictly positive integer; present-but-invalid is an error.
fn positive<F>(lookup: &F, key: &str) -> Result<Option<u64>, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(AppError::config(format!(
            "{key} must be a positive integer, got '{raw}'"
        ))),
    }
}
