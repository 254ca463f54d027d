//! Adapters for external dependencies.

pub mod users_memory;
pub mod users_sea;
