//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, path and query parameters.

mod auth;
mod path;
mod query;
mod validated;

pub use auth::{CurrentUser, VerifiedIdentity};
pub use path::ProjectIdPath;
pub use query::ApiQuery;
pub use validated::ValidatedJson;
