//! Collaborator traits - external systems the services hand work to

use async_trait::async_trait;

use crate::events::StaleView;
use crate::traits::RepoResult;

/// Binary object storage
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` under `key`, returning the public locator of the object
    ///
    /// Failures are reported as `DomainError::StorageError`.
    async fn put_object(&self, key: &str, content_type: &str, bytes: &[u8]) -> RepoResult<String>;
}

/// Notifies renderers that cached views are stale
#[async_trait]
pub trait ViewInvalidator: Send + Sync {
    async fn invalidate(&self, views: &[StaleView]) -> RepoResult<()>;
}
