//! File attachment entity - metadata for an object stored in object storage

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;

/// File metadata row, written only after the upload succeeded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    pub id: Uuid,
    pub project_id: Uuid,
    pub file_name: String,
    pub url: String,
    pub size: i64,
    pub uploaded_at: DateTime<Utc>,
}

impl FileAttachment {
    /// Create a validated attachment record
    pub fn new(
        project_id: Uuid,
        file_name: &str,
        url: &str,
        size: i64,
    ) -> Result<Self, DomainError> {
        let file_name = file_name.trim();
        if file_name.is_empty() {
            return Err(DomainError::ValidationError(
                "File name is required".to_string(),
            ));
        }
        let url = url.trim();
        if url.is_empty() {
            return Err(DomainError::ValidationError(
                "File url is required".to_string(),
            ));
        }
        if size < 0 {
            return Err(DomainError::ValidationError(
                "File size must not be negative".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            project_id,
            file_name: file_name.to_string(),
            url: url.to_string(),
            size,
            uploaded_at: Utc::now(),
        })
    }
}
