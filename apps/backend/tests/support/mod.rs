#![allow(dead_code)]

pub mod app_builder;
pub mod fixtures;

// Re-export only what current tests actually import
pub use app_builder::create_test_app;
pub use fixtures::{test_env, TestEnv};
