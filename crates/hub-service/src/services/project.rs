//! Project service
//!
//! Creation, status transitions, and the per-user project queries.

use std::str::FromStr;

use hub_core::entities::{AuditAction, Project, User};
use hub_core::{check_project_access, ProjectStatus, StaleView};
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::dto::{FileResponse, ProjectDetail, ProjectResponse, ProjectSummary};

use super::audit::AuditService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Project service
pub struct ProjectService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ProjectService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a draft project owned by `user`
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn create_project(&self, user: &User, name: &str) -> ServiceResult<ProjectResponse> {
        let project = Project::new(user.id, name)?;
        self.ctx.project_repo().create(&project).await?;

        info!(project_id = %project.id, "Project created");

        let audit = AuditService::new(self.ctx);
        audit
            .record_best_effort(
                user,
                AuditAction::ProjectCreated,
                json!({
                    "projectId": project.id,
                    "projectName": project.name,
                }),
            )
            .await;
        audit
            .invalidate(&[StaleView::Dashboard(project.owner_id), StaleView::Admin])
            .await;

        Ok(ProjectResponse::from(&project))
    }

    /// Move a project to another status
    ///
    /// Only the status column is written; the owner never changes. An unknown
    /// status is rejected before anything is written.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn update_project_status(
        &self,
        user: &User,
        project_id: Uuid,
        new_status: &str,
    ) -> ServiceResult<ProjectResponse> {
        let project = self.load_authorized(user, project_id).await?;
        let status =
            ProjectStatus::from_str(new_status).map_err(|e| ServiceError::invalid_input(e.to_string()))?;

        let updated = self.ctx.project_repo().update_status(project.id, status).await?;

        info!(
            project_id = %updated.id,
            old_status = %project.status,
            new_status = %updated.status,
            "Project status updated"
        );

        let audit = AuditService::new(self.ctx);
        audit
            .record_best_effort(
                user,
                AuditAction::StatusUpdated,
                json!({
                    "projectId": updated.id,
                    "oldStatus": project.status,
                    "newStatus": updated.status,
                }),
            )
            .await;
        audit
            .invalidate(&[
                StaleView::Project(updated.id),
                StaleView::Dashboard(updated.owner_id),
                StaleView::Admin,
            ])
            .await;

        Ok(ProjectResponse::from(&updated))
    }

    /// Projects owned by `user` with their file counts, newest first
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn list_projects_for_user(&self, user: &User) -> ServiceResult<Vec<ProjectSummary>> {
        let projects = self.ctx.project_repo().list_by_owner(user.id).await?;

        Ok(projects
            .iter()
            .map(|(project, file_count)| ProjectSummary::new(project, *file_count))
            .collect())
    }

    /// One project with its files, newest first
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn get_project(&self, user: &User, project_id: Uuid) -> ServiceResult<ProjectDetail> {
        let project = self.load_authorized(user, project_id).await?;
        let files = self.ctx.file_repo().list_by_project(project.id).await?;

        Ok(ProjectDetail {
            project: ProjectResponse::from(&project),
            files: files.iter().map(FileResponse::from).collect(),
        })
    }

    /// Load the project fresh from the store and run the access guard on it
    pub(crate) async fn load_authorized(&self, user: &User, project_id: Uuid) -> ServiceResult<Project> {
        let project = self.ctx.project_repo().find_by_id(project_id).await?;
        check_project_access(user, project).map_err(|e| ServiceError::from_access(e, project_id))
    }
}
