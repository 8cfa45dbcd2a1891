//! File service
//!
//! File metadata is written only for a project the caller may act on, and for
//! direct uploads only after the object store accepted the bytes.

use chrono::Utc;
use hub_core::entities::{AuditAction, FileAttachment, Project, User};
use hub_core::StaleView;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::dto::FileResponse;

use super::audit::AuditService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::project::ProjectService;

const MAX_STORED_NAME_LENGTH: usize = 100;

/// File service
pub struct FileService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FileService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Record metadata for a file already placed in object storage
    #[instrument(skip(self, user, url), fields(user_id = %user.id))]
    pub async fn save_file_attachment(
        &self,
        user: &User,
        project_id: Uuid,
        file_name: &str,
        url: &str,
        size: i64,
    ) -> ServiceResult<FileResponse> {
        let project = ProjectService::new(self.ctx)
            .load_authorized(user, project_id)
            .await?;
        let file = FileAttachment::new(project.id, file_name, url, size)?;

        self.persist(user, &project, &file).await?;
        Ok(FileResponse::from(&file))
    }

    /// Store the bytes, then record the metadata
    ///
    /// A storage failure leaves neither metadata nor an audit entry behind.
    #[instrument(skip(self, user, bytes), fields(user_id = %user.id, size = bytes.len()))]
    pub async fn upload_file(
        &self,
        user: &User,
        project_id: Uuid,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> ServiceResult<FileResponse> {
        let project = ProjectService::new(self.ctx)
            .load_authorized(user, project_id)
            .await?;

        let policy = self.ctx.upload_policy();
        if bytes.is_empty() {
            return Err(ServiceError::invalid_input("file is empty"));
        }
        if bytes.len() > policy.max_bytes {
            return Err(ServiceError::invalid_input(format!(
                "file exceeds the {} byte limit",
                policy.max_bytes
            )));
        }
        if !policy.allows_content_type(content_type) {
            return Err(ServiceError::invalid_input(format!(
                "content type '{content_type}' is not allowed"
            )));
        }
        let display_name = file_name.trim();
        if display_name.is_empty() {
            return Err(ServiceError::invalid_input("file name is required"));
        }

        let key = object_key(project.id, display_name);
        let url = self
            .ctx
            .object_storage()
            .put_object(&key, content_type, bytes)
            .await?;

        let size = i64::try_from(bytes.len())
            .map_err(|_| ServiceError::invalid_input("file is too large"))?;
        let file = FileAttachment::new(project.id, display_name, &url, size)?;

        self.persist(user, &project, &file).await?;
        Ok(FileResponse::from(&file))
    }

    async fn persist(&self, user: &User, project: &Project, file: &FileAttachment) -> ServiceResult<()> {
        self.ctx.file_repo().create(file).await?;

        info!(project_id = %project.id, file_id = %file.id, "File attached");

        let audit = AuditService::new(self.ctx);
        audit
            .record_best_effort(
                user,
                AuditAction::FileUploaded,
                json!({
                    "projectId": project.id,
                    "fileId": file.id,
                    "fileName": file.file_name,
                }),
            )
            .await;
        audit
            .invalidate(&[
                StaleView::Project(project.id),
                StaleView::Dashboard(project.owner_id),
            ])
            .await;

        Ok(())
    }
}

/// `projects/{project_id}/{millis}_{name}` with the name reduced to a safe charset
fn object_key(project_id: Uuid, file_name: &str) -> String {
    let mut name: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_STORED_NAME_LENGTH)
        .collect();
    if name.trim_matches('.').is_empty() {
        name = "file".to_string();
    }

    format!(
        "projects/{project_id}/{}_{name}",
        Utc::now().timestamp_millis()
    )
}
