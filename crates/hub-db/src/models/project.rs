//! Project database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for projects table
#[derive(Debug, Clone, FromRow)]
pub struct ProjectModel {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Project row with an aggregated file count
#[derive(Debug, Clone, FromRow)]
pub struct ProjectWithCountModel {
    #[sqlx(flatten)]
    pub project: ProjectModel,
    pub file_count: i64,
}

/// Project row joined with its owner
#[derive(Debug, Clone, FromRow)]
pub struct ProjectWithOwnerModel {
    #[sqlx(flatten)]
    pub project: ProjectModel,
    pub owner_email: String,
    pub file_count: i64,
}
