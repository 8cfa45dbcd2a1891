//! Project handlers
//!
//! Endpoints for project management. Every handler runs behind the identity
//! reconciler and the project guard.

use axum::{
    extract::{Path, State},
    Json,
};
use hub_service::{
    CreateProjectRequest, ProjectDetail, ProjectResponse, ProjectService, ProjectSummary,
    UpdateProjectStatusRequest,
};

use crate::extractors::{CurrentUser, ProjectIdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// List the caller's projects with file counts, newest first
///
/// GET /projects
pub async fn list_projects(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Vec<ProjectSummary>>> {
    let service = ProjectService::new(state.service_context());
    let response = service.list_projects_for_user(&user).await?;
    Ok(Json(response))
}

/// Create a project owned by the caller
///
/// POST /projects
pub async fn create_project(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(request): ValidatedJson<CreateProjectRequest>,
) -> ApiResult<Created<Json<ProjectResponse>>> {
    let service = ProjectService::new(state.service_context());
    let response = service.create_project(&user, &request.name).await?;
    Ok(Created(Json(response)))
}

/// Get a project with its files
///
/// GET /projects/{project_id}
pub async fn get_project(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(path): Path<ProjectIdPath>,
) -> ApiResult<Json<ProjectDetail>> {
    let project_id = path.project_id()?;

    let service = ProjectService::new(state.service_context());
    let response = service.get_project(&user, project_id).await?;
    Ok(Json(response))
}

/// Move a project to another status
///
/// PATCH /projects/{project_id}/status
pub async fn update_project_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(path): Path<ProjectIdPath>,
    ValidatedJson(request): ValidatedJson<UpdateProjectStatusRequest>,
) -> ApiResult<Json<ProjectResponse>> {
    let project_id = path.project_id()?;

    let service = ProjectService::new(state.service_context());
    let response = service
        .update_project_status(&user, project_id, &request.status)
        .await?;
    Ok(Json(response))
}
