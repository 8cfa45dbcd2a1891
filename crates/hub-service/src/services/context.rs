//! Service context - dependency container for services
//!
//! Holds the repositories and collaborators the services hand work to. Pools are
//! optional so the same context runs against in-memory doubles in tests.

use std::sync::Arc;

use hub_cache::{LoggingViewInvalidator, SharedRedisPool};
use hub_common::StorageConfig;
use hub_core::traits::{
    AuditLogRepository, FileRepository, ObjectStorage, ProjectRepository, UserRepository,
    ViewInvalidator,
};
use hub_db::PgPool;
use mime::Mime;

use super::error::{ServiceError, ServiceResult};
use super::provisioning::WebhookVerifier;

/// Limits applied to direct uploads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_bytes: usize,
}

impl UploadPolicy {
    #[must_use]
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    #[must_use]
    pub fn from_storage_config(config: &StorageConfig) -> Self {
        Self::new(config.max_file_size_bytes())
    }

    /// Whether `content_type` may be uploaded: any image or text type, or PDF.
    /// Parameters are ignored.
    #[must_use]
    pub fn allows_content_type(&self, content_type: &str) -> bool {
        let Ok(parsed) = content_type.trim().to_ascii_lowercase().parse::<Mime>() else {
            return false;
        };
        let (kind, subtype) = (parsed.type_(), parsed.subtype());
        kind == mime::IMAGE
            || kind == mime::TEXT
            || (kind == mime::APPLICATION && subtype == mime::PDF)
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::from_storage_config(&StorageConfig::default())
    }
}

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Pools (absent when running on in-memory doubles)
    pool: Option<PgPool>,
    redis_pool: Option<SharedRedisPool>,

    // Repositories
    user_repo: Arc<dyn UserRepository>,
    project_repo: Arc<dyn ProjectRepository>,
    file_repo: Arc<dyn FileRepository>,
    audit_repo: Arc<dyn AuditLogRepository>,

    // Collaborators
    object_storage: Arc<dyn ObjectStorage>,
    view_invalidator: Arc<dyn ViewInvalidator>,
    webhook_verifier: Arc<dyn WebhookVerifier>,

    upload_policy: UploadPolicy,
}

impl ServiceContext {
    #[must_use]
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Pools ===

    /// Get the PostgreSQL connection pool, if the context runs on one
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    /// Get the Redis connection pool, if configured
    pub fn redis_pool(&self) -> Option<&SharedRedisPool> {
        self.redis_pool.as_ref()
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn project_repo(&self) -> &dyn ProjectRepository {
        self.project_repo.as_ref()
    }

    pub fn file_repo(&self) -> &dyn FileRepository {
        self.file_repo.as_ref()
    }

    pub fn audit_repo(&self) -> &dyn AuditLogRepository {
        self.audit_repo.as_ref()
    }

    // === Collaborators ===

    pub fn object_storage(&self) -> &dyn ObjectStorage {
        self.object_storage.as_ref()
    }

    pub fn view_invalidator(&self) -> &dyn ViewInvalidator {
        self.view_invalidator.as_ref()
    }

    pub fn webhook_verifier(&self) -> &dyn WebhookVerifier {
        self.webhook_verifier.as_ref()
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        self.upload_policy
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &self.pool.as_ref().map(|_| "PgPool"))
            .field("redis_pool", &self.redis_pool.as_ref().map(|_| "SharedRedisPool"))
            .field("upload_policy", &self.upload_policy)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ServiceContext`]
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    redis_pool: Option<SharedRedisPool>,
    user_repo: Option<Arc<dyn UserRepository>>,
    project_repo: Option<Arc<dyn ProjectRepository>>,
    file_repo: Option<Arc<dyn FileRepository>>,
    audit_repo: Option<Arc<dyn AuditLogRepository>>,
    object_storage: Option<Arc<dyn ObjectStorage>>,
    view_invalidator: Option<Arc<dyn ViewInvalidator>>,
    webhook_verifier: Option<Arc<dyn WebhookVerifier>>,
    upload_policy: Option<UploadPolicy>,
}

impl ServiceContextBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    #[must_use]
    pub fn redis_pool(mut self, redis_pool: SharedRedisPool) -> Self {
        self.redis_pool = Some(redis_pool);
        self
    }

    #[must_use]
    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    #[must_use]
    pub fn project_repo(mut self, repo: Arc<dyn ProjectRepository>) -> Self {
        self.project_repo = Some(repo);
        self
    }

    #[must_use]
    pub fn file_repo(mut self, repo: Arc<dyn FileRepository>) -> Self {
        self.file_repo = Some(repo);
        self
    }

    #[must_use]
    pub fn audit_repo(mut self, repo: Arc<dyn AuditLogRepository>) -> Self {
        self.audit_repo = Some(repo);
        self
    }

    #[must_use]
    pub fn object_storage(mut self, storage: Arc<dyn ObjectStorage>) -> Self {
        self.object_storage = Some(storage);
        self
    }

    /// Defaults to [`LoggingViewInvalidator`] when not set
    #[must_use]
    pub fn view_invalidator(mut self, invalidator: Arc<dyn ViewInvalidator>) -> Self {
        self.view_invalidator = Some(invalidator);
        self
    }

    #[must_use]
    pub fn webhook_verifier(mut self, verifier: Arc<dyn WebhookVerifier>) -> Self {
        self.webhook_verifier = Some(verifier);
        self
    }

    #[must_use]
    pub fn upload_policy(mut self, policy: UploadPolicy) -> Self {
        self.upload_policy = Some(policy);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Internal` if a required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            pool: self.pool,
            redis_pool: self.redis_pool,
            user_repo: self.user_repo.ok_or_else(|| missing("user_repo"))?,
            project_repo: self.project_repo.ok_or_else(|| missing("project_repo"))?,
            file_repo: self.file_repo.ok_or_else(|| missing("file_repo"))?,
            audit_repo: self.audit_repo.ok_or_else(|| missing("audit_repo"))?,
            object_storage: self.object_storage.ok_or_else(|| missing("object_storage"))?,
            view_invalidator: self
                .view_invalidator
                .unwrap_or_else(|| Arc::new(LoggingViewInvalidator)),
            webhook_verifier: self.webhook_verifier.ok_or_else(|| missing("webhook_verifier"))?,
            upload_policy: self.upload_policy.unwrap_or_default(),
        })
    }
}

fn missing(dependency: &str) -> ServiceError {
    ServiceError::internal(format!("{dependency} is required"))
}
