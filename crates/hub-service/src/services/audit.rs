//! Audit service
//!
//! Appends audit entries after successful mutations and tells renderers which
//! views went stale. Neither step can undo a committed mutation.

use hub_core::entities::{AuditAction, AuditLogEntry, User};
use hub_core::StaleView;
use tracing::{error, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Audit service
pub struct AuditService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuditService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Append one entry attributed to `actor`
    #[instrument(skip(self, actor, metadata), fields(actor_id = %actor.id))]
    pub async fn record(
        &self,
        actor: &User,
        action: AuditAction,
        metadata: serde_json::Value,
    ) -> ServiceResult<AuditLogEntry> {
        let entry = AuditLogEntry::new(action, actor.id, metadata);
        self.ctx.audit_repo().append(&entry).await?;
        Ok(entry)
    }

    /// Like [`Self::record`], but a failure is logged instead of returned
    pub async fn record_best_effort(
        &self,
        actor: &User,
        action: AuditAction,
        metadata: serde_json::Value,
    ) -> Option<AuditLogEntry> {
        match self.record(actor, action, metadata).await {
            Ok(entry) => Some(entry),
            Err(e) => {
                error!(actor_id = %actor.id, action = %action, error = %e, "Failed to write audit entry");
                None
            }
        }
    }

    /// Mark views stale; failures are logged only
    pub async fn invalidate(&self, views: &[StaleView]) {
        if let Err(e) = self.ctx.view_invalidator().invalidate(views).await {
            warn!(count = views.len(), error = %e, "Failed to publish view invalidation");
        }
    }
}
