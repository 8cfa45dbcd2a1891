//! Admin handlers
//!
//! Cross-tenant views. Non-admins get 403.

use axum::{extract::State, Json};
use hub_service::{
    AdminOverview, AdminService, AuditEntryResponse, AuditQuery, ProjectWithOwnerResponse,
};

use crate::extractors::{ApiQuery, CurrentUser};
use crate::response::ApiResult;
use crate::state::AppState;

/// Every project with its owner
///
/// GET /admin/projects
pub async fn list_all_projects(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Vec<ProjectWithOwnerResponse>>> {
    let service = AdminService::new(state.service_context());
    let response = service.list_all_projects_with_owners(&user).await?;
    Ok(Json(response))
}

/// Recent audit entries
///
/// GET /admin/audit?limit=N
pub async fn list_recent_audit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiQuery(query): ApiQuery<AuditQuery>,
) -> ApiResult<Json<Vec<AuditEntryResponse>>> {
    let service = AdminService::new(state.service_context());
    let response = service.list_recent_audit(&user, query.limit).await?;
    Ok(Json(response))
}

/// Totals across all tenants
///
/// GET /admin/overview
pub async fn overview(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<AdminOverview>> {
    let service = AdminService::new(state.service_context());
    let response = service.overview(&user).await?;
    Ok(Json(response))
}
