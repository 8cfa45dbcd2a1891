//! Router-level tests against in-memory repositories
//!
//! Requests go through the full middleware stack with `oneshot`; no database
//! or network is needed.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use hub_api::{create_app, AppState};
use hub_common::{
    AppConfig, AppSettings, CorsConfig, DatabaseConfig, Environment, IdentityClaims,
    IdentityConfig, IdentityVerifier, RateLimitConfig, ServerConfig, StorageConfig,
    WebhookConfig,
};
use hub_service::testing::{InMemoryStore, MemoryObjectStorage, TestContext, TEST_WEBHOOK_SECRET};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const IDENTITY_SECRET: &str = "test-identity-secret-with-enough-length";

struct Harness {
    app: Router,
    store: InMemoryStore,
    storage: Arc<MemoryObjectStorage>,
    verifier: IdentityVerifier,
}

fn test_config() -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "project-hub-test".to_string(),
            env: Environment::Development,
        },
        api: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 0,
        },
        redis: None,
        identity: IdentityConfig {
            secret: IDENTITY_SECRET.to_string(),
            issuer: None,
        },
        webhook: WebhookConfig {
            secret: TEST_WEBHOOK_SECRET.to_string(),
        },
        rate_limit: RateLimitConfig {
            requests_per_second: 1000,
            burst: 1000,
        },
        cors: CorsConfig {
            allowed_origins: Vec::new(),
        },
        storage: StorageConfig::default(),
    }
}

fn harness() -> Harness {
    let TestContext {
        ctx,
        store,
        storage,
        ..
    } = TestContext::new();

    Harness {
        app: create_app(AppState::new(ctx, test_config())),
        store,
        storage,
        verifier: IdentityVerifier::new(IDENTITY_SECRET, None),
    }
}

impl Harness {
    fn token(&self, subject: &str, email: Option<&str>) -> String {
        let claims = IdentityClaims::new(subject, email.map(str::to_string), 300);
        self.verifier.issue(&claims).unwrap()
    }

    fn token_for(&self, subject: &str) -> String {
        self.token(subject, Some(&format!("{subject}@example.com")))
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn json(&self, method: Method, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn create_project(&self, token: &str, name: &str) -> String {
        let (status, body) = self
            .json(Method::POST, "/api/v1/projects", token, json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let h = harness();

    let (status, body) = h.get("/api/v1/projects", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "MISSING_AUTHORIZATION");
    assert_eq!(h.store.user_writes(), 0);
}

#[tokio::test]
async fn test_forged_token_is_unauthorized() {
    let h = harness();
    let forged = IdentityVerifier::new("some-other-secret-entirely", None)
        .issue(&IdentityClaims::new("user_a", Some("a@example.com".into()), 300))
        .unwrap();

    let (status, body) = h.get("/api/v1/users/@me", Some(&forged)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_first_sign_in_creates_user() {
    let h = harness();
    let token = h.token_for("user_new");

    let (status, _) = h.get("/api/v1/users/@me/status", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(h.store.user_rows("user_new"), 0);

    let (status, body) = h.get("/api/v1/users/@me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "user_new@example.com");
    assert_eq!(body["role"], "user");

    let (_, body) = h.get("/api/v1/users/@me/status", Some(&token)).await;
    assert_eq!(body["synced"], true);
    assert_eq!(h.store.user_rows("user_new"), 1);
}

#[tokio::test]
async fn test_identity_without_email_is_unauthorized() {
    let h = harness();
    let token = h.token("user_no_email", None);

    let (status, body) = h.get("/api/v1/projects", Some(&token)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHENTICATED");
    assert_eq!(h.store.user_rows("user_no_email"), 0);
}

// ============================================================================
// Projects
// ============================================================================

#[tokio::test]
async fn test_create_and_list_projects() {
    let h = harness();
    let token = h.token_for("user_a");

    let id = h.create_project(&token, "Alpha").await;

    let (status, body) = h.get("/api/v1/projects", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let projects = body.as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["id"], id.as_str());
    assert_eq!(projects[0]["status"], "draft");
    assert_eq!(projects[0]["file_count"], 0);
}

#[tokio::test]
async fn test_blank_project_name_is_rejected() {
    let h = harness();
    let token = h.token_for("user_a");

    let (status, body) = h
        .json(Method::POST, "/api/v1/projects", &token, json!({ "name": "" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_foreign_and_missing_projects_look_the_same() {
    let h = harness();
    let owner = h.token_for("user_a");
    let stranger = h.token_for("user_b");
    let id = h.create_project(&owner, "Alpha").await;

    let (foreign_status, foreign_body) =
        h.get(&format!("/api/v1/projects/{id}"), Some(&stranger)).await;
    let (missing_status, missing_body) = h
        .get(&format!("/api/v1/projects/{}", uuid::Uuid::new_v4()), Some(&stranger))
        .await;

    assert_eq!(foreign_status, StatusCode::FORBIDDEN);
    assert_eq!(missing_status, StatusCode::FORBIDDEN);
    assert_eq!(foreign_body, missing_body);
    assert_eq!(foreign_body["error"]["code"], "ACCESS_DENIED");
}

#[tokio::test]
async fn test_invalid_project_id_is_bad_request() {
    let h = harness();
    let token = h.token_for("user_a");

    let (status, body) = h.get("/api/v1/projects/not-a-uuid", Some(&token)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_PATH_PARAMETER");
}

#[tokio::test]
async fn test_status_update() {
    let h = harness();
    let token = h.token_for("user_a");
    let id = h.create_project(&token, "Alpha").await;
    let uri = format!("/api/v1/projects/{id}/status");

    let (status, body) = h
        .json(Method::PATCH, &uri, &token, json!({ "status": "active" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");

    let (status, body) = h
        .json(Method::PATCH, &uri, &token, json!({ "status": "archived" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");

    let stranger = h.token_for("user_b");
    let (status, _) = h
        .json(Method::PATCH, &uri, &stranger, json!({ "status": "completed" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// ============================================================================
// Files
// ============================================================================

#[tokio::test]
async fn test_save_file_and_read_back() {
    let h = harness();
    let token = h.token_for("user_a");
    let id = h.create_project(&token, "Alpha").await;

    let (status, body) = h
        .json(
            Method::POST,
            &format!("/api/v1/projects/{id}/files"),
            &token,
            json!({ "file_name": "spec.pdf", "url": "https://cdn.example.com/spec.pdf", "size": 2048 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["file_name"], "spec.pdf");

    let (_, detail) = h.get(&format!("/api/v1/projects/{id}"), Some(&token)).await;
    assert_eq!(detail["files"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_upload_file() {
    let h = harness();
    let token = h.token_for("user_a");
    let id = h.create_project(&token, "Alpha").await;

    let request = Request::builder()
        .method(Method::PUT)
        .uri(format!("/api/v1/projects/{id}/files/upload?file_name=notes.txt"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("hello"))
        .unwrap();
    let (status, body) = h.send(request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["size"], 5);
    assert_eq!(h.storage.objects().len(), 1);
    assert_eq!(h.store.files().len(), 1);
}

#[tokio::test]
async fn test_upload_rejects_disallowed_type() {
    let h = harness();
    let token = h.token_for("user_a");
    let id = h.create_project(&token, "Alpha").await;

    let request = Request::builder()
        .method(Method::PUT)
        .uri(format!("/api/v1/projects/{id}/files/upload?file_name=run.exe"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/x-msdownload")
        .body(Body::from("MZ"))
        .unwrap();
    let (status, _) = h.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(h.storage.objects().is_empty());
    assert!(h.store.files().is_empty());
}

// ============================================================================
// Admin
// ============================================================================

#[tokio::test]
async fn test_admin_routes_require_admin() {
    let h = harness();
    let token = h.token_for("user_a");

    for uri in ["/api/v1/admin/projects", "/api/v1/admin/audit", "/api/v1/admin/overview"] {
        let (status, body) = h.get(uri, Some(&token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(body["error"]["code"], "ACCESS_DENIED");
    }
}

#[tokio::test]
async fn test_admin_views() {
    let h = harness();
    h.store
        .seed_user("root", "root@example.com", hub_core::Role::Admin);
    let admin = h.token_for("root");
    let user = h.token_for("user_a");
    h.create_project(&user, "Alpha").await;
    h.create_project(&user, "Beta").await;

    let (status, body) = h.get("/api/v1/admin/projects", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let projects = body.as_array().unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0]["owner_email"], "user_a@example.com");

    let (_, body) = h.get("/api/v1/admin/audit?limit=1", Some(&admin)).await;
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["action"], "PROJECT_CREATED");
    assert_eq!(entries[0]["metadata"]["projectName"], "Beta");

    let (_, body) = h.get("/api/v1/admin/overview", Some(&admin)).await;
    assert_eq!(body["total_users"], 2);
    assert_eq!(body["total_projects"], 2);
    assert_eq!(body["total_files"], 0);
}

#[tokio::test]
async fn test_bad_audit_limit_is_rejected() {
    let h = harness();
    h.store
        .seed_user("root", "root@example.com", hub_core::Role::Admin);
    let admin = h.token_for("root");

    let (status, body) = h.get("/api/v1/admin/audit?limit=lots", Some(&admin)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_QUERY_PARAMETER");
}

// ============================================================================
// Webhooks
// ============================================================================

fn webhook_request(secret: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/webhooks/identity")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(secret) = secret {
        builder = builder.header("x-webhook-secret", secret);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn test_webhook_provisions_user() {
    let h = harness();
    let event = json!({
        "type": "user.created",
        "data": { "id": "user_hook", "email_addresses": [{ "email_address": "hook@example.com" }] }
    });

    let (status, body) = h
        .send(webhook_request(Some(TEST_WEBHOOK_SECRET), &event))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Webhook received");
    assert_eq!(h.store.user_rows("user_hook"), 1);
}

#[tokio::test]
async fn test_webhook_rejects_bad_signature() {
    let h = harness();
    let event = json!({ "type": "user.created", "data": { "id": "user_hook" } });

    let (missing, _) = h.send(webhook_request(None, &event)).await;
    let (wrong, _) = h.send(webhook_request(Some("nope"), &event)).await;

    assert_eq!(missing, StatusCode::BAD_REQUEST);
    assert_eq!(wrong, StatusCode::BAD_REQUEST);
    assert_eq!(h.store.user_rows("user_hook"), 0);
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health() {
    let h = harness();

    let (status, body) = h.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    // No database pool behind the in-memory repositories
    let (status, body) = h.get("/health/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["checks"]["database"], "unhealthy");
    assert_eq!(body["checks"]["redis"], "disabled");
}
