//! Request-level orchestration on top of the auth core.

pub mod auth_flow;
