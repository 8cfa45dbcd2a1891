//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod admin;
pub mod files;
pub mod health;
pub mod projects;
pub mod users;
pub mod webhooks;
