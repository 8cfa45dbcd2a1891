//! Test helpers for integration tests
//!
//! Spawns a server on an ephemeral port, mints identity tokens, and wraps
//! common HTTP calls.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use hub_api::{create_app, create_app_state};
use hub_common::{
    AppConfig, AppSettings, CorsConfig, DatabaseConfig, Environment, IdentityClaims,
    IdentityConfig, IdentityVerifier, RateLimitConfig, RedisConfig, ServerConfig, StorageConfig,
    WebhookConfig,
};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Secret the test server trusts for session tokens
pub const TEST_IDENTITY_SECRET: &str = "integration-identity-secret-0123456789";

/// Secret the test server expects on webhook deliveries
pub const TEST_WEBHOOK_SECRET: &str = "whsec_integration";

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    verifier: IdentityVerifier,
    database_url: String,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()?).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let verifier = IdentityVerifier::new(&config.identity.secret, config.identity.issuer.clone());
        let database_url = config.database.url.clone();

        let state = create_app_state(config).await?;
        let app = create_app(state);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            verifier,
            database_url,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Session token for a subject with a primary email
    pub fn token(&self, subject: &str, email: Option<&str>) -> Result<String> {
        let claims = IdentityClaims::new(subject, email.map(str::to_string), 600);
        Ok(self.verifier.issue(&claims)?)
    }

    /// Grant the admin role; there is no HTTP route for this
    pub async fn promote_to_admin(&self, subject: &str) -> Result<()> {
        let pool = sqlx::PgPool::connect(&self.database_url).await?;
        sqlx::query("UPDATE users SET role = 'admin' WHERE external_id = $1")
            .bind(subject)
            .execute(&pool)
            .await?;
        pool.close().await;
        Ok(())
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a GET request with auth token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).bearer_auth(token).send().await?)
    }

    /// Make a POST request with auth token
    pub async fn post_auth<T: Serialize>(&self, path: &str, token: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Make a PATCH request with auth token
    pub async fn patch_auth<T: Serialize>(&self, path: &str, token: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .patch(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Upload raw bytes with auth token
    pub async fn upload_auth(
        &self,
        path: &str,
        token: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .put(&url)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?)
    }

    /// Deliver a webhook event
    pub async fn post_webhook<T: Serialize>(&self, secret: Option<&str>, body: &T) -> Result<Response> {
        let url = format!("{}/api/v1/webhooks/identity", self.base_url());
        let mut request = self.client.post(&url).json(body);
        if let Some(secret) = secret {
            request = request.header("x-webhook-secret", secret);
        }
        Ok(request.send().await?)
    }
}

/// Create a test configuration
///
/// The database (and optionally Redis) come from the environment; the secrets
/// are fixed so tests can mint their own tokens.
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let upload_dir = std::env::temp_dir().join(format!("hub-it-{}", std::process::id()));

    Ok(AppConfig {
        app: AppSettings {
            name: "project-hub-it".to_string(),
            env: Environment::Development,
        },
        api: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: database_url,
            max_connections: 5,
            min_connections: 1,
        },
        redis: std::env::var("REDIS_URL").ok().map(|url| RedisConfig {
            url,
            max_connections: 4,
        }),
        identity: IdentityConfig {
            secret: TEST_IDENTITY_SECRET.to_string(),
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
        storage: StorageConfig {
            upload_dir: upload_dir.to_string_lossy().into_owned(),
            ..StorageConfig::default()
        },
    })
}

/// Helper to check if test environment is available
pub fn check_test_env() -> bool {
    dotenvy::dotenv().ok();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }
    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}
