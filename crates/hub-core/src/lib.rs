//! # hub-core
//!
//! Domain layer containing entities, value objects, the access policy, repository
//! traits, and collaborator traits.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod policy;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    AuditAction, AuditActionParseError, AuditEntryWithActor, AuditLogEntry, FileAttachment,
    NewUser, Project, ProjectWithOwner, User, MAX_PROJECT_NAME_LENGTH,
};
pub use error::DomainError;
pub use events::StaleView;
pub use policy::{authorize, check_project_access, require_admin, AccessDecision, AccessError};
pub use traits::{
    AuditLogRepository, FileRepository, InsertOutcome, ObjectStorage, ProjectRepository,
    RepoResult, UserRepository, ViewInvalidator,
};
pub use value_objects::{
    ExternalIdentity, ProjectStatus, ProjectStatusParseError, Role, RoleParseError,
};
