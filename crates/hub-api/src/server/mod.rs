//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use hub_cache::{LoggingViewInvalidator, RedisPool, RedisViewInvalidator};
use hub_common::{AppConfig, AppError};
use hub_core::ViewInvalidator;
use hub_db::{
    apply_schema, create_pool, PgAuditLogRepository, PgFileRepository, PgProjectRepository,
    PgUserRepository, PoolConfig,
};
use hub_service::{LocalObjectStorage, ServiceContextBuilder, SharedSecretVerifier, UploadPolicy};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// Health probes are merged after the middleware so they bypass rate limiting.
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let router = create_router(&config.storage);
    let router = apply_middleware(
        router,
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    );
    router.merge(health_routes()).with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&PoolConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    apply_schema(&pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to apply schema: {e}")))?;
    info!("PostgreSQL connection established");

    let mut builder = ServiceContextBuilder::new();

    let view_invalidator: Arc<dyn ViewInvalidator> = match &config.redis {
        Some(redis_config) => {
            info!("Connecting to Redis...");
            let redis_pool =
                RedisPool::from_config(redis_config).map_err(|e| AppError::Cache(e.to_string()))?;
            builder = builder.redis_pool(Arc::new(redis_pool.clone()));
            info!("Redis pool created");
            Arc::new(RedisViewInvalidator::new(redis_pool))
        }
        None => {
            warn!("REDIS_URL not set; view invalidations are only logged");
            Arc::new(LoggingViewInvalidator)
        }
    };

    let storage = LocalObjectStorage::from_config(&config.storage);
    info!(root = %storage.root().display(), "Local object storage ready");

    let service_context = builder
        .pool(pool.clone())
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .project_repo(Arc::new(PgProjectRepository::new(pool.clone())))
        .file_repo(Arc::new(PgFileRepository::new(pool.clone())))
        .audit_repo(Arc::new(PgAuditLogRepository::new(pool)))
        .object_storage(Arc::new(storage))
        .view_invalidator(view_invalidator)
        .webhook_verifier(Arc::new(SharedSecretVerifier::new(&config.webhook.secret)))
        .upload_policy(UploadPolicy::from_storage_config(&config.storage))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let address = config.api.address();
    let addr: SocketAddr = address
        .parse()
        .map_err(|_| AppError::Config(format!("Invalid listen address: {address}")))?;

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, addr).await
}
