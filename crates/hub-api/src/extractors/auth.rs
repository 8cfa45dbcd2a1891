//! Authentication extractors
//!
//! The bearer token is verified by the identity provider's key, then the
//! identity is reconciled into a local user.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use hub_core::entities::User;
use hub_core::ExternalIdentity;
use hub_service::IdentityService;

use crate::response::ApiError;
use crate::state::AppState;

/// Identity vouched for by a valid session token, not yet reconciled
#[derive(Debug, Clone)]
pub struct VerifiedIdentity(pub ExternalIdentity);

#[async_trait]
impl<S> FromRequestParts<S> for VerifiedIdentity
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);

        let identity = app_state
            .identity_verifier()
            .verify(bearer.token())
            .map_err(|e| {
                tracing::warn!(error = %e, "Invalid session token");
                ApiError::App(e)
            })?;

        Ok(VerifiedIdentity(identity))
    }
}

/// The local user behind the request, created on first sign-in
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let VerifiedIdentity(identity) = VerifiedIdentity::from_request_parts(parts, state).await?;

        let app_state = AppState::from_ref(state);
        let user = IdentityService::new(app_state.service_context())
            .require_user(Some(&identity))
            .await?;

        Ok(CurrentUser(user))
    }
}
