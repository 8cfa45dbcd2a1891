//! PostgreSQL implementation of AuditLogRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use hub_core::entities::{AuditEntryWithActor, AuditLogEntry};
use hub_core::traits::{AuditLogRepository, RepoResult};

use crate::mappers::map_rows;
use crate::models::AuditWithActorModel;

use super::error::map_db_error;

/// PostgreSQL implementation of AuditLogRepository
#[derive(Clone)]
pub struct PgAuditLogRepository {
    pool: PgPool,
}

impl PgAuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogRepository for PgAuditLogRepository {
    #[instrument(skip(self, entry), fields(action = %entry.action, actor_id = %entry.actor_id))]
    async fn append(&self, entry: &AuditLogEntry) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO audit_logs (id, action, actor_id, metadata, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(entry.id)
        .bind(entry.action.as_str())
        .bind(entry.actor_id)
        .bind(&entry.metadata)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_recent(&self, limit: i64) -> RepoResult<Vec<AuditEntryWithActor>> {
        let rows = sqlx::query_as::<_, AuditWithActorModel>(
            r"
            SELECT a.id, a.action, a.actor_id, a.metadata, a.created_at,
                   u.email AS actor_email
            FROM audit_logs a
            LEFT JOIN users u ON u.id = a.actor_id
            ORDER BY a.created_at DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        map_rows(rows)
    }
}
