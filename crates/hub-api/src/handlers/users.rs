//! User handlers
//!
//! The signed-in user's own record and sync status.

use axum::{extract::State, Json};
use hub_service::{IdentityService, UserResponse, UserStatusResponse};

use crate::extractors::{CurrentUser, VerifiedIdentity};
use crate::response::ApiResult;
use crate::state::AppState;

/// Get the current user, creating the local record on first sign-in
///
/// GET /users/@me
pub async fn get_current_user(CurrentUser(user): CurrentUser) -> ApiResult<Json<UserResponse>> {
    Ok(Json(UserResponse::from(user)))
}

/// Whether the signed-in identity already has a local record
///
/// GET /users/@me/status
pub async fn get_user_status(
    State(state): State<AppState>,
    VerifiedIdentity(identity): VerifiedIdentity,
) -> ApiResult<Json<UserStatusResponse>> {
    let service = IdentityService::new(state.service_context());
    let response = service.status(&identity).await?;
    Ok(Json(response))
}
