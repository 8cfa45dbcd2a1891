//! Traits (ports) - interfaces the domain needs from the outside world

mod collaborators;
mod repositories;

pub use collaborators::{ObjectStorage, ViewInvalidator};
pub use repositories::{
    AuditLogRepository, FileRepository, InsertOutcome, ProjectRepository, RepoResult,
    UserRepository,
};
