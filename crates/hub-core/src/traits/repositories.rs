//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{
    AuditEntryWithActor, AuditLogEntry, FileAttachment, NewUser, Project, ProjectWithOwner, User,
};
use crate::error::DomainError;
use crate::value_objects::ProjectStatus;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Result of an atomic create-if-absent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// This call created the row
    Created(User),
    /// A row for the same external id already existed (possibly from a concurrent writer)
    AlreadyExists(User),
}

impl InsertOutcome {
    #[inline]
    pub fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    pub fn into_user(self) -> User {
        match self {
            Self::Created(user) | Self::AlreadyExists(user) => user,
        }
    }
}

// ============================================================================
// User Repository
// ============================================================================

/// Soft-deleted users are invisible to every method except `upsert_by_external_id`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>>;

    /// Find user by identity-provider subject id
    async fn find_by_external_id(&self, external_id: &str) -> RepoResult<Option<User>>;

    /// Create the user, or refresh the email of the live row with the same external id
    ///
    /// Never creates a second row for one external id. The returned tag says
    /// whether this call inserted the row. A soft-deleted row is not touched and
    /// is reported as `DomainError::DuplicateExternalId`.
    async fn insert_if_absent(&self, user: &NewUser) -> RepoResult<InsertOutcome>;

    /// Create or update by external id, setting the email (and reviving a deleted row)
    async fn upsert_by_external_id(&self, user: &NewUser) -> RepoResult<User>;

    /// Soft delete by external id; returns whether a live row was deleted
    async fn soft_delete_by_external_id(&self, external_id: &str) -> RepoResult<bool>;

    /// Number of live users
    async fn count(&self) -> RepoResult<i64>;
}

// ============================================================================
// Project Repository
// ============================================================================

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Find project by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Project>>;

    /// Insert a new project
    async fn create(&self, project: &Project) -> RepoResult<()>;

    /// Write only the status column; errors with `ProjectNotFound` when absent
    async fn update_status(&self, id: Uuid, status: ProjectStatus) -> RepoResult<Project>;

    /// Projects of one owner with their file counts, newest first
    async fn list_by_owner(&self, owner_id: Uuid) -> RepoResult<Vec<(Project, i64)>>;

    /// Every project with owner email and file count, newest first
    async fn list_all_with_owners(&self) -> RepoResult<Vec<ProjectWithOwner>>;

    async fn count(&self) -> RepoResult<i64>;
}

// ============================================================================
// File Repository
// ============================================================================

#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Insert file metadata
    async fn create(&self, file: &FileAttachment) -> RepoResult<()>;

    /// Files of a project, newest first
    async fn list_by_project(&self, project_id: Uuid) -> RepoResult<Vec<FileAttachment>>;

    async fn count(&self) -> RepoResult<i64>;
}

// ============================================================================
// Audit Log Repository
// ============================================================================

/// Append-only: there is deliberately no update or delete.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Append one entry
    async fn append(&self, entry: &AuditLogEntry) -> RepoResult<()>;

    /// Most recent entries with actor email, newest first
    async fn list_recent(&self, limit: i64) -> RepoResult<Vec<AuditEntryWithActor>>;
}
