//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use hub_core::entities::{AuditEntryWithActor, FileAttachment, Project, ProjectWithOwner, User};

use super::responses::{
    AuditEntryResponse, FileResponse, ProjectResponse, ProjectSummary, ProjectWithOwnerResponse,
    UserResponse,
};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

// ============================================================================
// Project Mappers
// ============================================================================

impl From<&Project> for ProjectResponse {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            owner_id: project.owner_id,
            name: project.name.clone(),
            status: project.status,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

impl ProjectSummary {
    pub fn new(project: &Project, file_count: i64) -> Self {
        Self {
            project: ProjectResponse::from(project),
            file_count,
        }
    }
}

impl From<&ProjectWithOwner> for ProjectWithOwnerResponse {
    fn from(row: &ProjectWithOwner) -> Self {
        Self {
            project: ProjectResponse::from(&row.project),
            owner_email: row.owner_email.clone(),
            file_count: row.file_count,
        }
    }
}

// ============================================================================
// File Mappers
// ============================================================================

impl From<&FileAttachment> for FileResponse {
    fn from(file: &FileAttachment) -> Self {
        Self {
            id: file.id,
            project_id: file.project_id,
            file_name: file.file_name.clone(),
            url: file.url.clone(),
            size: file.size,
            uploaded_at: file.uploaded_at,
        }
    }
}

// ============================================================================
// Audit Mappers
// ============================================================================

impl From<&AuditEntryWithActor> for AuditEntryResponse {
    fn from(row: &AuditEntryWithActor) -> Self {
        Self {
            id: row.entry.id,
            action: row.entry.action,
            actor_id: row.entry.actor_id,
            actor_email: row.actor_email.clone(),
            metadata: row.entry.metadata.clone(),
            created_at: row.entry.created_at,
        }
    }
}
