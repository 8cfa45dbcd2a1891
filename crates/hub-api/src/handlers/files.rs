//! File handlers
//!
//! Attachment metadata and direct uploads into object storage.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    Json,
};
use hub_service::{FileResponse, FileService, SaveFileRequest, UploadQuery};

use crate::extractors::{ApiQuery, CurrentUser, ProjectIdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Record a file that already lives in object storage
///
/// POST /projects/{project_id}/files
pub async fn save_file(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(path): Path<ProjectIdPath>,
    ValidatedJson(request): ValidatedJson<SaveFileRequest>,
) -> ApiResult<Created<Json<FileResponse>>> {
    let project_id = path.project_id()?;

    let service = FileService::new(state.service_context());
    let response = service
        .save_file_attachment(&user, project_id, &request.file_name, &request.url, request.size)
        .await?;
    Ok(Created(Json(response)))
}

/// Upload raw bytes as a project file
///
/// PUT /projects/{project_id}/files/upload?file_name=...
///
/// The request body is the file; `Content-Type` must be an allowed type.
pub async fn upload_file(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(path): Path<ProjectIdPath>,
    ApiQuery(query): ApiQuery<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Created<Json<FileResponse>>> {
    let project_id = path.project_id()?;
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let service = FileService::new(state.service_context());
    let response = service
        .upload_file(&user, project_id, &query.file_name, content_type, &body)
        .await?;
    Ok(Created(Json(response)))
}
