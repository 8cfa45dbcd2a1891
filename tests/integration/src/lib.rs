//! Integration test utilities for the project hub
//!
//! Helpers for running end-to-end tests against a live server backed by
//! PostgreSQL.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
