use crate::error::AppError;

/// Connection settings for the user store database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(super::env_lookup)
    }

    /// Build from an arbitrary key lookup (`DATABASE_URL`, `DATABASE_MAX_CONNECTIONS`).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::config("DATABASE_URL must be set"))?;

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            None => 10,
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    AppError::config(format!(
                        "DATABASE_MAX_CONNECTIONS must be a positive integer, got '{raw}'"
                    ))
                })?,
        };

        Ok(Self {
            url,
            max_connections,
        })
    }
}
