//! Integration test modules.

pub mod asset_tests;
pub mod auth_tests;
pub mod common;
pub mod health_tests;
