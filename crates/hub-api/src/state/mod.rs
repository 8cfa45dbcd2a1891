//! Application state
//!
//! Holds the shared state for the Axum application: the service context, the
//! identity token verifier, and configuration.

use std::sync::Arc;

use hub_common::{AppConfig, IdentityVerifier};
use hub_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    identity_verifier: Arc<IdentityVerifier>,
    config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState; the verifier is built from `config.identity`
    pub fn new(service_context: ServiceContext, config: AppConfig) -> Self {
        let identity_verifier =
            IdentityVerifier::new(&config.identity.secret, config.identity.issuer.clone());
        Self {
            service_context: Arc::new(service_context),
            identity_verifier: Arc::new(identity_verifier),
            config: Arc::new(config),
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn identity_verifier(&self) -> &IdentityVerifier {
        &self.identity_verifier
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &self.service_context)
            .field("identity_verifier", &self.identity_verifier)
            .field("app", &self.config.app.name)
            .finish_non_exhaustive()
    }
}
