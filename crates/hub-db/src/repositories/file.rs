//! PostgreSQL implementation of FileRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use hub_core::entities::FileAttachment;
use hub_core::traits::{FileRepository, RepoResult};

use crate::mappers::map_rows;
use crate::models::FileModel;

use super::error::map_db_error;

/// PostgreSQL implementation of FileRepository
#[derive(Clone)]
pub struct PgFileRepository {
    pool: PgPool,
}

impl PgFileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRepository for PgFileRepository {
    #[instrument(skip(self, file), fields(file_id = %file.id, project_id = %file.project_id))]
    async fn create(&self, file: &FileAttachment) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO files (id, project_id, file_name, url, size, uploaded_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(file.id)
        .bind(file.project_id)
        .bind(&file.file_name)
        .bind(&file.url)
        .bind(file.size)
        .bind(file.uploaded_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_by_project(&self, project_id: Uuid) -> RepoResult<Vec<FileAttachment>> {
        let rows = sqlx::query_as::<_, FileModel>(
            r"
            SELECT id, project_id, file_name, url, size, uploaded_at
            FROM files
            WHERE project_id = $1
            ORDER BY uploaded_at DESC
            ",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        map_rows(rows)
    }

    #[instrument(skip(self))]
    async fn count(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM files")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }
}
