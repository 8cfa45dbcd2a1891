//! Provisioning service
//!
//! Applies user lifecycle events pushed by the identity provider. These run
//! alongside interactive sign-ins for the same subject; the store's upsert keeps
//! one row per external id and the last write decides the email.

use hub_core::entities::{NewUser, User};
use hub_core::StaleView;
use subtle::ConstantTimeEq;
use tracing::{debug, info, instrument, warn};

use crate::dto::IdentityWebhookEvent;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

pub const USER_CREATED: &str = "user.created";
pub const USER_UPDATED: &str = "user.updated";
pub const USER_DELETED: &str = "user.deleted";

/// Authenticates webhook deliveries before their payload is trusted
pub trait WebhookVerifier: Send + Sync {
    /// # Errors
    /// `InvalidInput` when the signature is missing or does not match
    fn verify(&self, signature: Option<&str>, payload: &[u8]) -> ServiceResult<()>;
}

/// Accepts deliveries whose signature header equals a shared secret
pub struct SharedSecretVerifier {
    secret: String,
}

impl SharedSecretVerifier {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl WebhookVerifier for SharedSecretVerifier {
    fn verify(&self, signature: Option<&str>, _payload: &[u8]) -> ServiceResult<()> {
        let signature = signature
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ServiceError::invalid_input("missing webhook signature"))?;

        let matches = bool::from(signature.as_bytes().ct_eq(self.secret.as_bytes()));
        if self.secret.is_empty() || !matches {
            return Err(ServiceError::invalid_input("webhook verification failed"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for SharedSecretVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecretVerifier").finish_non_exhaustive()
    }
}

/// What a delivered event did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisioningOutcome {
    Upserted(User),
    Deleted { external_id: String, existed: bool },
    Ignored(String),
}

/// Provisioning service
pub struct ProvisioningService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ProvisioningService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Verify a raw delivery, parse it, and apply it
    #[instrument(skip(self, signature, payload), fields(bytes = payload.len()))]
    pub async fn handle_delivery(
        &self,
        signature: Option<&str>,
        payload: &[u8],
    ) -> ServiceResult<ProvisioningOutcome> {
        self.ctx.webhook_verifier().verify(signature, payload)?;

        let event: IdentityWebhookEvent = serde_json::from_slice(payload)
            .map_err(|e| ServiceError::invalid_input(format!("malformed webhook payload: {e}")))?;

        self.apply(event).await
    }

    /// Apply an already verified event
    #[instrument(skip(self, event), fields(event_type = %event.event_type))]
    pub async fn apply(&self, event: IdentityWebhookEvent) -> ServiceResult<ProvisioningOutcome> {
        match event.event_type.as_str() {
            USER_CREATED | USER_UPDATED => {
                let external_id = event
                    .subject()
                    .ok_or_else(|| ServiceError::invalid_input("event has no user id"))?;
                let email = event
                    .primary_email()
                    .ok_or_else(|| ServiceError::invalid_input("no email address in event"))?;

                let user = self
                    .ctx
                    .user_repo()
                    .upsert_by_external_id(&NewUser::new(external_id, email))
                    .await?;

                info!(user_id = %user.id, "User provisioned");
                self.invalidate_admin().await;
                Ok(ProvisioningOutcome::Upserted(user))
            }
            USER_DELETED => {
                let external_id = event
                    .subject()
                    .ok_or_else(|| ServiceError::invalid_input("event has no user id"))?;

                let existed = self
                    .ctx
                    .user_repo()
                    .soft_delete_by_external_id(external_id)
                    .await?;

                if existed {
                    info!(external_id = %external_id, "User deleted");
                    self.invalidate_admin().await;
                } else {
                    debug!(external_id = %external_id, "Delete for unknown user ignored");
                }
                Ok(ProvisioningOutcome::Deleted {
                    external_id: external_id.to_string(),
                    existed,
                })
            }
            other => {
                debug!(event_type = %other, "Unhandled webhook event");
                Ok(ProvisioningOutcome::Ignored(other.to_string()))
            }
        }
    }

    async fn invalidate_admin(&self) {
        if let Err(e) = self.ctx.view_invalidator().invalidate(&[StaleView::Admin]).await {
            warn!(error = %e, "Failed to publish view invalidation");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_secret_verifier() {
        let verifier = SharedSecretVerifier::new("whsec_test");

        assert!(verifier.verify(Some("whsec_test"), b"{}").is_ok());
        assert!(matches!(
            verifier.verify(None, b"{}"),
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            verifier.verify(Some(""), b"{}"),
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            verifier.verify(Some("whsec_tesx"), b"{}"),
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_secret_rejects_everything() {
        let verifier = SharedSecretVerifier::new("");
        assert!(verifier.verify(Some("anything"), b"{}").is_err());
    }

    #[test]
    fn test_signature_of_different_length_rejected() {
        let verifier = SharedSecretVerifier::new("whsec_test");
        assert!(verifier.verify(Some("whsec_test_extra"), b"{}").is_err());
        assert!(verifier.verify(Some("whsec"), b"{}").is_err());
        assert!(verifier.verify(Some("whsec_test"), b"{}").is_ok());
    }
}
