//! Admin service
//!
//! Cross-tenant views; every method requires the admin role.

use hub_core::entities::User;
use hub_core::{require_admin, AccessDecision};
use tracing::instrument;

use crate::dto::{AdminOverview, AuditEntryResponse, ProjectWithOwnerResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

pub const DEFAULT_AUDIT_LIMIT: i64 = 10;
pub const MAX_AUDIT_LIMIT: i64 = 100;

/// Admin service
pub struct AdminService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AdminService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Every project with its owner's email and file count, newest first
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn list_all_projects_with_owners(
        &self,
        user: &User,
    ) -> ServiceResult<Vec<ProjectWithOwnerResponse>> {
        ensure_admin(user)?;
        let projects = self.ctx.project_repo().list_all_with_owners().await?;
        Ok(projects.iter().map(ProjectWithOwnerResponse::from).collect())
    }

    /// The `limit` most recent audit entries, newest first
    ///
    /// `limit` defaults to 10 and is clamped to `1..=100`.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn list_recent_audit(
        &self,
        user: &User,
        limit: Option<i64>,
    ) -> ServiceResult<Vec<AuditEntryResponse>> {
        ensure_admin(user)?;
        let limit = clamp_audit_limit(limit);
        let entries = self.ctx.audit_repo().list_recent(limit).await?;
        Ok(entries.iter().map(AuditEntryResponse::from).collect())
    }

    /// Totals for the admin dashboard
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn overview(&self, user: &User) -> ServiceResult<AdminOverview> {
        ensure_admin(user)?;
        Ok(AdminOverview {
            total_users: self.ctx.user_repo().count().await?,
            total_projects: self.ctx.project_repo().count().await?,
            total_files: self.ctx.file_repo().count().await?,
        })
    }
}

fn ensure_admin(user: &User) -> ServiceResult<()> {
    match require_admin(user) {
        AccessDecision::Allow => Ok(()),
        AccessDecision::Deny => Err(ServiceError::Forbidden),
    }
}

pub fn clamp_audit_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_AUDIT_LIMIT).clamp(1, MAX_AUDIT_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_audit_limit() {
        assert_eq!(clamp_audit_limit(None), 10);
        assert_eq!(clamp_audit_limit(Some(0)), 1);
        assert_eq!(clamp_audit_limit(Some(-5)), 1);
        assert_eq!(clamp_audit_limit(Some(50)), 50);
        assert_eq!(clamp_audit_limit(Some(10_000)), 100);
    }
}
