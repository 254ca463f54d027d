pub mod auth;
pub mod db;

/// Reads a variable from the process environment.
pub(crate) fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
