//! Path parameter extractors

use serde::Deserialize;
use uuid::Uuid;

use crate::response::ApiError;

/// Path parameters with project_id
#[derive(Debug, Deserialize)]
pub struct ProjectIdPath {
    pub project_id: String,
}

impl ProjectIdPath {
    /// Parse project_id as a UUID
    pub fn project_id(&self) -> Result<Uuid, ApiError> {
        self.project_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid project_id format"))
    }
}
