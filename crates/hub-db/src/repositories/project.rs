//! PostgreSQL implementation of ProjectRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use hub_core::entities::{Project, ProjectWithOwner};
use hub_core::traits::{ProjectRepository, RepoResult};
use hub_core::value_objects::ProjectStatus;

use crate::mappers::{map_rows, ProjectCount};
use crate::models::{ProjectModel, ProjectWithCountModel, ProjectWithOwnerModel};

use super::error::{map_db_error, project_not_found};

/// PostgreSQL implementation of ProjectRepository
#[derive(Clone)]
pub struct PgProjectRepository {
    pool: PgPool,
}

impl PgProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for PgProjectRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Project>> {
        let result = sqlx::query_as::<_, ProjectModel>(
            r"
            SELECT id, owner_id, name, status, created_at, updated_at
            FROM projects
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Project::try_from).transpose()
    }

    #[instrument(skip(self, project), fields(project_id = %project.id))]
    async fn create(&self, project: &Project) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO projects (id, owner_id, name, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(project.id)
        .bind(project.owner_id)
        .bind(&project.name)
        .bind(project.status.as_str())
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: Uuid, status: ProjectStatus) -> RepoResult<Project> {
        let result = sqlx::query_as::<_, ProjectModel>(
            r"
            UPDATE projects
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, owner_id, name, status, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        match result {
            Some(model) => Project::try_from(model),
            None => Err(project_not_found(id)),
        }
    }

    #[instrument(skip(self))]
    async fn list_by_owner(&self, owner_id: Uuid) -> RepoResult<Vec<(Project, i64)>> {
        let rows = sqlx::query_as::<_, ProjectWithCountModel>(
            r"
            SELECT p.id, p.owner_id, p.name, p.status, p.created_at, p.updated_at,
                   (SELECT COUNT(*) FROM files f WHERE f.project_id = p.id) AS file_count
            FROM projects p
            WHERE p.owner_id = $1
            ORDER BY p.created_at DESC
            ",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let counted: Vec<ProjectCount> = map_rows(rows)?;
        Ok(counted
            .into_iter()
            .map(|ProjectCount(project, count)| (project, count))
            .collect())
    }

    #[instrument(skip(self))]
    async fn list_all_with_owners(&self) -> RepoResult<Vec<ProjectWithOwner>> {
        let rows = sqlx::query_as::<_, ProjectWithOwnerModel>(
            r"
            SELECT p.id, p.owner_id, p.name, p.status, p.created_at, p.updated_at,
                   u.email AS owner_email,
                   (SELECT COUNT(*) FROM files f WHERE f.project_id = p.id) AS file_count
            FROM projects p
            JOIN users u ON u.id = p.owner_id
            ORDER BY p.created_at DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        map_rows(rows)
    }

    #[instrument(skip(self))]
    async fn count(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }
}
