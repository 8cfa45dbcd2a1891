//! Filesystem-backed object storage
//!
//! Objects are written below a root directory and served back under a public
//! URL prefix.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use hub_common::StorageConfig;
use hub_core::{DomainError, ObjectStorage, RepoResult};
use tokio::fs;
use tracing::{debug, instrument};

/// Stores objects on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalObjectStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.upload_dir, &config.public_base_url)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Relative path for `key`; rejects anything that could leave the root
    fn relative_path(key: &str) -> RepoResult<PathBuf> {
        let key = key.trim_start_matches('/');
        if key.is_empty() {
            return Err(DomainError::StorageError("empty object key".to_string()));
        }

        let path = Path::new(key);
        let mut relative = PathBuf::new();
        for component in path.components() {
            match component {
                Component::Normal(part) => relative.push(part),
                _ => {
                    return Err(DomainError::StorageError(format!(
                        "invalid object key '{key}'"
                    )))
                }
            }
        }
        Ok(relative)
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn put_object(&self, key: &str, content_type: &str, bytes: &[u8]) -> RepoResult<String> {
        let relative = Self::relative_path(key)?;
        let target = self.root.join(&relative);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::StorageError(e.to_string()))?;
        }
        fs::write(&target, bytes)
            .await
            .map_err(|e| DomainError::StorageError(e.to_string()))?;

        let locator = format!(
            "{}/{}",
            self.public_base_url,
            relative.to_string_lossy().replace('\\', "/")
        );
        debug!(path = %target.display(), "Object stored");
        Ok(locator)
    }
}
