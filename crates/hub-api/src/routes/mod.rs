//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post, put},
    Router,
};
use hub_common::StorageConfig;
use tower_http::services::ServeDir;

use crate::handlers::{admin, files, health, projects, users, webhooks};
use crate::state::AppState;

/// Create the main API router (health probes are separate)
pub fn create_router(storage: &StorageConfig) -> Router<AppState> {
    let router = Router::new().nest("/api/v1", api_v1_routes(storage.max_file_size_bytes()));

    // Locally stored objects are served read-only under their public prefix
    if storage.public_base_url.starts_with('/') && storage.public_base_url.len() > 1 {
        router.nest_service(&storage.public_base_url, ServeDir::new(&storage.upload_dir))
    } else {
        router
    }
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .merge(user_routes())
        .merge(project_routes(upload_limit))
        .merge(admin_routes())
        .merge(webhook_routes())
}

/// Current user routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/@me", get(users::get_current_user))
        .route("/users/@me/status", get(users::get_user_status))
}

/// Project and file routes
fn project_routes(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route("/projects/:project_id", get(projects::get_project))
        .route(
            "/projects/:project_id/status",
            patch(projects::update_project_status),
        )
        .route("/projects/:project_id/files", post(files::save_file))
        // Oversized bodies are cut off here; the service re-checks the exact limit
        .route(
            "/projects/:project_id/files/upload",
            put(files::upload_file).layer(DefaultBodyLimit::max(upload_limit.saturating_add(1))),
        )
}

/// Admin-only routes
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/projects", get(admin::list_all_projects))
        .route("/admin/audit", get(admin::list_recent_audit))
        .route("/admin/overview", get(admin::overview))
}

/// Identity provider webhooks
fn webhook_routes() -> Router<AppState> {
    Router::new().route("/webhooks/identity", post(webhooks::identity_webhook))
}
