//! Webhook handlers
//!
//! Lifecycle events from the identity provider. The raw body is handed to the
//! verifier before it is parsed.

use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use hub_service::{ProvisioningService, WebhookAck};

use crate::response::ApiResult;
use crate::state::AppState;

/// Header carrying the webhook signature
pub const WEBHOOK_SIGNATURE_HEADER: &str = "x-webhook-secret";

/// Receive an identity provider event
///
/// POST /webhooks/identity
pub async fn identity_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<WebhookAck>> {
    let signature = headers
        .get(WEBHOOK_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    let service = ProvisioningService::new(state.service_context());
    let outcome = service.handle_delivery(signature, &body).await?;
    tracing::debug!(?outcome, "Webhook processed");

    Ok(Json(WebhookAck::received()))
}
