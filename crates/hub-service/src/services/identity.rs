//! Identity service - the reconciler
//!
//! Turns a verified [`ExternalIdentity`] into exactly one local [`User`],
//! creating it on first sign-in. Concurrent first sign-ins for the same subject
//! all resolve to the single row that won.

use hub_core::entities::{NewUser, User};
use hub_core::{DomainError, ExternalIdentity, InsertOutcome};
use tracing::{debug, info, instrument, warn};

use crate::dto::{UserResponse, UserStatusResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Outcome of resolving an identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(User),
    Unauthenticated,
}

impl Resolution {
    pub fn into_user(self) -> Option<User> {
        match self {
            Self::Resolved(user) => Some(user),
            Self::Unauthenticated => None,
        }
    }
}

/// Identity service
pub struct IdentityService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> IdentityService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve the local user for an identity, creating it on first sign-in
    ///
    /// A missing identity, or a new subject without an email, is
    /// `Unauthenticated` rather than an error.
    #[instrument(skip(self, identity), fields(subject = identity.map(|i| i.subject.as_str())))]
    pub async fn resolve_user(
        &self,
        identity: Option<&ExternalIdentity>,
    ) -> ServiceResult<Resolution> {
        let Some(identity) = identity else {
            return Ok(Resolution::Unauthenticated);
        };

        if let Some(user) = self
            .ctx
            .user_repo()
            .find_by_external_id(&identity.subject)
            .await?
        {
            debug!(user_id = %user.id, "Identity resolved to existing user");
            return Ok(Resolution::Resolved(user));
        }

        let Some(email) = identity.email() else {
            debug!("New identity has no email, not creating a user");
            return Ok(Resolution::Unauthenticated);
        };

        let new_user = NewUser::new(&identity.subject, email);
        match self.ctx.user_repo().insert_if_absent(&new_user).await {
            Ok(InsertOutcome::Created(user)) => {
                info!(user_id = %user.id, "User created on first sign-in");
                Ok(Resolution::Resolved(user))
            }
            Ok(InsertOutcome::AlreadyExists(user)) => {
                warn!(user_id = %user.id, "Row written concurrently, email refreshed");
                Ok(Resolution::Resolved(user))
            }
            Err(DomainError::DuplicateExternalId(_)) => self.recover_after_conflict(identity).await,
            Err(e) => Err(e.into()),
        }
    }

    /// Re-read after the store reported a conflicting writer
    async fn recover_after_conflict(
        &self,
        identity: &ExternalIdentity,
    ) -> ServiceResult<Resolution> {
        match self
            .ctx
            .user_repo()
            .find_by_external_id(&identity.subject)
            .await?
        {
            Some(user) => {
                warn!(user_id = %user.id, "Duplicate external id recovered by re-read");
                Ok(Resolution::Resolved(user))
            }
            None => {
                warn!("Conflicting writer left no live user");
                Ok(Resolution::Unauthenticated)
            }
        }
    }

    /// Resolve or fail with `Unauthenticated`
    pub async fn require_user(&self, identity: Option<&ExternalIdentity>) -> ServiceResult<User> {
        self.resolve_user(identity)
            .await?
            .into_user()
            .ok_or(ServiceError::Unauthenticated)
    }

    /// Whether the identity already has a local user; never writes
    #[instrument(skip(self, identity), fields(subject = %identity.subject))]
    pub async fn status(&self, identity: &ExternalIdentity) -> ServiceResult<UserStatusResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_external_id(&identity.subject)
            .await?;

        Ok(UserStatusResponse {
            synced: user.is_some(),
            user: user.as_ref().map(UserResponse::from),
        })
    }
}
