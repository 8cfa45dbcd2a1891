//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in hub-core.

mod audit_log;
mod error;
mod file;
mod project;
mod user;

pub use audit_log::PgAuditLogRepository;
pub use file::PgFileRepository;
pub use project::PgProjectRepository;
pub use user::PgUserRepository;
