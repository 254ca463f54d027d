#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod auth;
pub mod config;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod web;

// Re-exports for public API
pub use auth::claims::{ClaimSet, Subject};
pub use auth::jwt::{TokenCodec, TokenPair};
pub use auth::rotation::{RotationHandle, RotationScheduler};
pub use auth::secret_store::{SecretSource, SecretStore, SigningSecret};
pub use error::AppError;
pub use extractors::auth_token::AuthToken;
pub use extractors::current_user::CurrentUser;
pub use infra::db::connect_db;
pub use middleware::request_trace::RequestTrace;
pub use services::auth_flow::{AuthFlow, GrantRequest, LoginOutcome, LoginRequest};
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
