//! File database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for files table
#[derive(Debug, Clone, FromRow)]
pub struct FileModel {
    pub id: Uuid,
    pub project_id: Uuid,
    pub file_name: String,
    pub url: String,
    pub size: i64,
    pub uploaded_at: DateTime<Utc>,
}
