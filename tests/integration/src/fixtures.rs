//! Test fixtures and data generators
//!
//! Request bodies and the response shapes tests read back.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

/// Provider subject that no other test uses
pub fn unique_subject() -> String {
    format!("user_{}", Uuid::new_v4().simple())
}

/// Email matching [`unique_subject`]
pub fn email_for(subject: &str) -> String {
    format!("{subject}@example.com")
}

/// Create project request
#[derive(Debug, Serialize)]
pub struct CreateProjectRequest {
    pub name: String,
}

impl CreateProjectRequest {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Status change request
#[derive(Debug, Serialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

impl UpdateStatusRequest {
    pub fn to(status: &str) -> Self {
        Self {
            status: status.to_string(),
        }
    }
}

/// File metadata request
#[derive(Debug, Serialize)]
pub struct SaveFileRequest {
    pub file_name: String,
    pub url: String,
    pub size: i64,
}

impl SaveFileRequest {
    pub fn pdf(name: &str) -> Self {
        Self {
            file_name: name.to_string(),
            url: format!("https://cdn.example.com/{name}"),
            size: 4096,
        }
    }
}

/// Identity provider webhook body
pub fn user_event(event_type: &str, subject: &str, email: Option<&str>) -> Value {
    let email_addresses: Vec<Value> = email
        .map(|e| vec![json!({ "email_address": e })])
        .unwrap_or_default();
    json!({
        "type": event_type,
        "data": { "id": subject, "email_addresses": email_addresses }
    })
}

#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct UserStatusResponse {
    pub synced: bool,
    pub user: Option<UserResponse>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectResponse {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub file_count: i64,
}

#[derive(Debug, Deserialize)]
pub struct FileResponse {
    pub id: String,
    pub project_id: String,
    pub file_name: String,
    pub url: String,
    pub size: i64,
}

#[derive(Debug, Deserialize)]
pub struct ProjectDetail {
    pub id: String,
    pub status: String,
    pub files: Vec<FileResponse>,
}

#[derive(Debug, Deserialize)]
pub struct AuditEntry {
    pub action: String,
    pub actor_id: String,
    pub metadata: Value,
}

#[derive(Debug, Deserialize)]
pub struct AdminOverview {
    pub total_users: i64,
    pub total_projects: i64,
    pub total_files: i64,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
