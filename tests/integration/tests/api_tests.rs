//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance (DATABASE_URL)
//! - Optionally Redis (REDIS_URL) for view invalidation
//!
//! Run with: cargo test -p integration-tests --test api_tests

use futures::future::join_all;
use integration_tests::{
    assert_json, assert_status, check_test_env, email_for, fixtures::*, unique_subject,
    TestServer, TEST_WEBHOOK_SECRET,
};
use reqwest::StatusCode;

fn signed_in(server: &TestServer) -> (String, String) {
    let subject = unique_subject();
    let token = server.token(&subject, Some(&email_for(&subject))).unwrap();
    (subject, token)
}

async fn create_project(server: &TestServer, token: &str, name: &str) -> ProjectResponse {
    let response = server
        .post_auth("/api/v1/projects", token, &CreateProjectRequest::named(name))
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Identity Tests
// ============================================================================

#[tokio::test]
async fn test_unauthenticated_request() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let response = server.get("/api/v1/projects").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_first_sign_in_creates_one_user() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let (subject, token) = signed_in(&server);

    let response = server.get_auth("/api/v1/users/@me/status", &token).await.unwrap();
    let status: UserStatusResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!status.synced);

    let mut ids = Vec::new();
    for _ in 0..3 {
        let response = server.get_auth("/api/v1/users/@me", &token).await.unwrap();
        let user: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(user.email, email_for(&subject));
        assert_eq!(user.role, "user");
        ids.push(user.id);
    }
    ids.dedup();
    assert_eq!(ids.len(), 1);
}

#[tokio::test]
async fn test_concurrent_first_sign_in() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let (_, token) = signed_in(&server);

    let responses =
        join_all((0..8).map(|_| server.get_auth("/api/v1/users/@me", &token))).await;

    let mut ids = Vec::new();
    for response in responses {
        let user: UserResponse = assert_json(response.unwrap(), StatusCode::OK).await.unwrap();
        ids.push(user.id);
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 1);
}

#[tokio::test]
async fn test_identity_without_email_is_rejected() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let token = server.token(&unique_subject(), None).unwrap();

    let response = server.get_auth("/api/v1/users/@me", &token).await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.error.code, "UNAUTHENTICATED");
}

// ============================================================================
// Project Tests
// ============================================================================

#[tokio::test]
async fn test_project_lifecycle() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let (_, token) = signed_in(&server);

    let project = create_project(&server, &token, "Alpha").await;
    assert_eq!(project.name, "Alpha");
    assert_eq!(project.status, "draft");

    let response = server
        .patch_auth(
            &format!("/api/v1/projects/{}/status", project.id),
            &token,
            &UpdateStatusRequest::to("active"),
        )
        .await
        .unwrap();
    let updated: ProjectResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated.status, "active");
    assert_eq!(updated.owner_id, project.owner_id);

    let response = server
        .patch_auth(
            &format!("/api/v1/projects/{}/status", project.id),
            &token,
            &UpdateStatusRequest::to("archived"),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server.get_auth("/api/v1/projects", &token).await.unwrap();
    let projects: Vec<ProjectSummary> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].id, project.id);
    assert_eq!(projects[0].file_count, 0);
}

#[tokio::test]
async fn test_tenant_isolation() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let (_, owner) = signed_in(&server);
    let (_, stranger) = signed_in(&server);
    let project = create_project(&server, &owner, "Private").await;

    let response = server
        .get_auth(&format!("/api/v1/projects/{}", project.id), &stranger)
        .await
        .unwrap();
    let foreign: ErrorBody = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .get_auth(
            &format!("/api/v1/projects/{}", uuid::Uuid::new_v4()),
            &stranger,
        )
        .await
        .unwrap();
    let missing: ErrorBody = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();

    assert_eq!(foreign.error.code, missing.error.code);
    assert_eq!(foreign.error.message, missing.error.message);

    let response = server
        .post_auth(
            &format!("/api/v1/projects/{}/files", project.id),
            &stranger,
            &SaveFileRequest::pdf("leak.pdf"),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server.get_auth("/api/v1/projects", &stranger).await.unwrap();
    let projects: Vec<ProjectSummary> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(projects.is_empty());
}

// ============================================================================
// File Tests
// ============================================================================

#[tokio::test]
async fn test_files() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let (_, token) = signed_in(&server);
    let project = create_project(&server, &token, "Files").await;

    let response = server
        .post_auth(
            &format!("/api/v1/projects/{}/files", project.id),
            &token,
            &SaveFileRequest::pdf("brief.pdf"),
        )
        .await
        .unwrap();
    let saved: FileResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(saved.project_id, project.id);

    let response = server
        .upload_auth(
            &format!("/api/v1/projects/{}/files/upload?file_name=notes.txt", project.id),
            &token,
            "text/plain",
            b"meeting notes".to_vec(),
        )
        .await
        .unwrap();
    let uploaded: FileResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(uploaded.size, 13);
    assert!(uploaded.url.starts_with("/uploads/projects/"));

    let response = server.get(&uploaded.url).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "meeting notes");

    let response = server
        .get_auth(&format!("/api/v1/projects/{}", project.id), &token)
        .await
        .unwrap();
    let detail: ProjectDetail = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(detail.files.len(), 2);
    assert_eq!(detail.files[0].id, uploaded.id);
    assert_eq!(detail.files[1].file_name, saved.file_name);
}

// ============================================================================
// Admin Tests
// ============================================================================

#[tokio::test]
async fn test_admin_views() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let (admin_subject, admin) = signed_in(&server);
    let (_, user) = signed_in(&server);

    let response = server.get_auth("/api/v1/admin/overview", &admin).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    server.promote_to_admin(&admin_subject).await.unwrap();
    let project = create_project(&server, &user, "Audited").await;

    let response = server.get_auth("/api/v1/admin/audit?limit=100", &admin).await.unwrap();
    let entries: Vec<AuditEntry> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(entries.iter().any(|e| {
        e.action == "PROJECT_CREATED" && e.metadata["projectId"] == project.id.as_str()
    }));

    let response = server.get_auth("/api/v1/admin/overview", &admin).await.unwrap();
    let overview: AdminOverview = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(overview.total_users >= 2);
    assert!(overview.total_projects >= 1);

    let response = server.get_auth("/api/v1/admin/projects", &user).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

// ============================================================================
// Webhook Tests
// ============================================================================

#[tokio::test]
async fn test_webhook_lifecycle() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let subject = unique_subject();
    let token = server.token(&subject, None).unwrap();

    let created = user_event("user.created", &subject, Some("first@example.com"));
    let response = server.post_webhook(None, &created).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .post_webhook(Some(TEST_WEBHOOK_SECRET), &created)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    // The provisioned row lets an email-less session resolve
    let response = server.get_auth("/api/v1/users/@me", &token).await.unwrap();
    let user: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(user.email, "first@example.com");

    let updated = user_event("user.updated", &subject, Some("second@example.com"));
    let response = server
        .post_webhook(Some(TEST_WEBHOOK_SECRET), &updated)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get_auth("/api/v1/users/@me", &token).await.unwrap();
    let user: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(user.email, "second@example.com");

    let deleted = user_event("user.deleted", &subject, None);
    let response = server
        .post_webhook(Some(TEST_WEBHOOK_SECRET), &deleted)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get_auth("/api/v1/users/@me", &token).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}
