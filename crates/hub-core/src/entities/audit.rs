//! Audit log entry - append-only record of a successful mutation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Kind of mutation recorded in the audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    ProjectCreated,
    FileUploaded,
    StatusUpdated,
}

impl AuditAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProjectCreated => "PROJECT_CREATED",
            Self::FileUploaded => "FILE_UPLOADED",
            Self::StatusUpdated => "STATUS_UPDATED",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown audit action: {0}")]
pub struct AuditActionParseError(pub String);

impl FromStr for AuditAction {
    type Err = AuditActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PROJECT_CREATED" => Ok(Self::ProjectCreated),
            "FILE_UPLOADED" => Ok(Self::FileUploaded),
            "STATUS_UPDATED" => Ok(Self::StatusUpdated),
            other => Err(AuditActionParseError(other.to_string())),
        }
    }
}

/// One audit record
///
/// `metadata` is a JSON object whose keys depend on `action`.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub action: AuditAction,
    pub actor_id: Uuid,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    pub fn new(action: AuditAction, actor_id: Uuid, metadata: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            action,
            actor_id,
            metadata,
            created_at: Utc::now(),
        }
    }
}

/// Audit entry joined with the actor's email (admin activity feed)
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntryWithActor {
    pub entry: AuditLogEntry,
    pub actor_email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_format() {
        assert_eq!(
            serde_json::to_string(&AuditAction::ProjectCreated).unwrap(),
            "\"PROJECT_CREATED\""
        );
        assert_eq!(AuditAction::StatusUpdated.to_string(), "STATUS_UPDATED");
        assert_eq!(
            "FILE_UPLOADED".parse::<AuditAction>().unwrap(),
            AuditAction::FileUploaded
        );
        assert!("PROJECT_DELETED".parse::<AuditAction>().is_err());
    }
}
