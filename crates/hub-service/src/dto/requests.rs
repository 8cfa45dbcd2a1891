//! Request DTOs for API endpoints
//!
//! Body DTOs implement `Deserialize` and `Validate`. Validation here only
//! rejects obviously malformed input early; the services re-check every rule.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Project Requests
// ============================================================================

/// Create project request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200, message = "Project name must be 1-200 characters"))]
    pub name: String,
}

/// Status transition request; the value is checked against the known statuses
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProjectStatusRequest {
    #[validate(length(min = 1, max = 32, message = "Status is required"))]
    pub status: String,
}

// ============================================================================
// File Requests
// ============================================================================

/// Metadata for a file the client already put in object storage
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveFileRequest {
    #[validate(length(min = 1, max = 255, message = "File name must be 1-255 characters"))]
    pub file_name: String,

    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,

    #[validate(range(min = 0, message = "Size must not be negative"))]
    pub size: i64,
}

/// Query string of a direct upload
#[derive(Debug, Clone, Deserialize)]
pub struct UploadQuery {
    pub file_name: String,
}

// ============================================================================
// Admin Requests
// ============================================================================

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AuditQuery {
    pub limit: Option<i64>,
}

// ============================================================================
// Provisioning Webhook
// ============================================================================

/// Identity provider lifecycle event
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityWebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: WebhookUserData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookUserData {
    pub id: Option<String>,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailAddress {
    pub email_address: String,
}

impl IdentityWebhookEvent {
    /// Provider subject id, if present and non-blank
    pub fn subject(&self) -> Option<&str> {
        self.data
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// The first listed address is the primary one
    pub fn primary_email(&self) -> Option<&str> {
        self.data
            .email_addresses
            .first()
            .map(|e| e.email_address.trim())
            .filter(|e| !e.is_empty())
    }
}
