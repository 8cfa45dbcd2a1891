//! Audit log database models

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for audit_logs table
#[derive(Debug, Clone, FromRow)]
pub struct AuditLogModel {
    pub id: Uuid,
    /// SCREAMING_SNAKE_CASE action name
    pub action: String,
    pub actor_id: Uuid,
    pub metadata: JsonValue,
    pub created_at: DateTime<Utc>,
}

/// Audit row joined with the actor's email
#[derive(Debug, Clone, FromRow)]
pub struct AuditWithActorModel {
    #[sqlx(flatten)]
    pub entry: AuditLogModel,
    pub actor_email: Option<String>,
}
