//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, Utc};
use hub_core::{AuditAction, ProjectStatus, Role};
use serde::Serialize;
use uuid::Uuid;

// ============================================================================
// User Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Whether the signed-in identity already has a local user
#[derive(Debug, Clone, Serialize)]
pub struct UserStatusResponse {
    pub synced: bool,
    pub user: Option<UserResponse>,
}

// ============================================================================
// Project Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Dashboard row: a project and how many files it has
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    #[serde(flatten)]
    pub project: ProjectResponse,
    pub file_count: i64,
}

/// Project page: a project and its files, newest first
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: ProjectResponse,
    pub files: Vec<FileResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub file_name: String,
    pub url: String,
    pub size: i64,
    pub uploaded_at: DateTime<Utc>,
}

// ============================================================================
// Admin Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ProjectWithOwnerResponse {
    #[serde(flatten)]
    pub project: ProjectResponse,
    pub owner_email: String,
    pub file_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditEntryResponse {
    pub id: Uuid,
    pub action: AuditAction,
    pub actor_id: Uuid,
    /// Absent when the actor has since been deleted
    pub actor_email: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdminOverview {
    pub total_users: i64,
    pub total_projects: i64,
    pub total_files: i64,
}

// ============================================================================
// Webhook Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct WebhookAck {
    pub message: &'static str,
}

impl WebhookAck {
    pub fn received() -> Self {
        Self {
            message: "Webhook received",
        }
    }
}

// ============================================================================
// Health Responses
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each backing service
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub redis: String,
}

impl ReadinessResponse {
    /// `redis` is `None` when Redis is not configured; that does not block readiness
    pub fn ready(database_healthy: bool, redis: Option<bool>) -> Self {
        let all_healthy = database_healthy && redis.unwrap_or(true);
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: health_label(database_healthy).to_string(),
                redis: redis.map_or("disabled", health_label).to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

fn health_label(healthy: bool) -> &'static str {
    if healthy {
        "healthy"
    } else {
        "unhealthy"
    }
}
