//! Project entity - a named container of files owned by one user

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;
use crate::value_objects::ProjectStatus;

/// Longest accepted project name, in characters
pub const MAX_PROJECT_NAME_LENGTH: usize = 200;

/// Project entity
///
/// `owner_id` is fixed at creation. Projects are never deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a draft project after normalising the name
    pub fn new(owner_id: Uuid, name: &str) -> Result<Self, DomainError> {
        let name = Self::normalize_name(name)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            owner_id,
            name,
            status: ProjectStatus::Draft,
            created_at: now,
            updated_at: now,
        })
    }

    /// Trim and validate a project name
    pub fn normalize_name(name: &str) -> Result<String, DomainError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::ValidationError(
                "Project name is required".to_string(),
            ));
        }
        if trimmed.chars().count() > MAX_PROJECT_NAME_LENGTH {
            return Err(DomainError::ValidationError(format!(
                "Project name must be at most {MAX_PROJECT_NAME_LENGTH} characters"
            )));
        }
        Ok(trimmed.to_string())
    }

    #[inline]
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }
}

/// Project joined with its owner's email and file count (admin listing)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectWithOwner {
    pub project: Project,
    pub owner_email: String,
    pub file_count: i64,
}
