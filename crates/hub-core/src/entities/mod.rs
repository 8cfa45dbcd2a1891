//! Domain entities - core business objects

mod audit;
mod file;
mod project;
mod user;

pub use audit::{AuditAction, AuditActionParseError, AuditEntryWithActor, AuditLogEntry};
pub use file::FileAttachment;
pub use project::{Project, ProjectWithOwner, MAX_PROJECT_NAME_LENGTH};
pub use user::{NewUser, User};
