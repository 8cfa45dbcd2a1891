//! Audit log model -> entity mappers

use hub_core::{AuditAction, AuditEntryWithActor, AuditLogEntry, DomainError};

use super::corrupt_column;
use crate::models::{AuditLogModel, AuditWithActorModel};

impl TryFrom<AuditLogModel> for AuditLogEntry {
    type Error = DomainError;

    fn try_from(model: AuditLogModel) -> Result<Self, Self::Error> {
        let action: AuditAction = model
            .action
            .parse()
            .map_err(|e| corrupt_column("audit_logs.action", e))?;

        Ok(AuditLogEntry {
            id: model.id,
            action,
            actor_id: model.actor_id,
            metadata: model.metadata,
            created_at: model.created_at,
        })
    }
}

impl TryFrom<AuditWithActorModel> for AuditEntryWithActor {
    type Error = DomainError;

    fn try_from(model: AuditWithActorModel) -> Result<Self, Self::Error> {
        Ok(AuditEntryWithActor {
            entry: AuditLogEntry::try_from(model.entry)?,
            actor_email: model.actor_email,
        })
    }
}
