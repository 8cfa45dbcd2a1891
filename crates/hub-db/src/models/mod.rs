//! Database models - SQLx-compatible structs for PostgreSQL tables

mod audit_log;
mod file;
mod project;
mod user;

pub use audit_log::{AuditLogModel, AuditWithActorModel};
pub use file::FileModel;
pub use project::{ProjectModel, ProjectWithCountModel, ProjectWithOwnerModel};
pub use user::UserModel;
