//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use hub_core::entities::{NewUser, User};
use hub_core::error::DomainError;
use hub_core::traits::{InsertOutcome, RepoResult, UserRepository};

use crate::models::UserModel;

use super::error::{map_db_error, map_unique_violation};

const USER_COLUMNS: &str =
    "id, external_id, email, role, created_at, updated_at, deleted_at";

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_external_id(&self, external_id: &str) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE external_id = $1 AND deleted_at IS NULL"
        ))
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }

    #[instrument(skip(self, user), fields(external_id = %user.external_id))]
    async fn insert_if_absent(&self, user: &NewUser) -> RepoResult<InsertOutcome> {
        let candidate = user.clone().into_user();

        // A live row takes the latest email; a soft-deleted row is left alone
        let row = sqlx::query(&format!(
            r"
            INSERT INTO users (id, external_id, email, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (external_id) DO UPDATE
            SET email = EXCLUDED.email, updated_at = NOW()
            WHERE users.deleted_at IS NULL
            RETURNING {USER_COLUMNS}, (xmax = 0) AS inserted
            "
        ))
        .bind(candidate.id)
        .bind(&candidate.external_id)
        .bind(&candidate.email)
        .bind(candidate.role.as_str())
        .bind(candidate.created_at)
        .bind(candidate.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::DuplicateExternalId(user.external_id.clone())
            })
        })?;

        let Some(row) = row else {
            debug!("external id belongs to a deleted user");
            return Err(DomainError::DuplicateExternalId(user.external_id.clone()));
        };

        let inserted: bool = row.try_get("inserted").map_err(map_db_error)?;
        let stored = User::try_from(UserModel::from_row(&row).map_err(map_db_error)?)?;

        if inserted {
            Ok(InsertOutcome::Created(stored))
        } else {
            debug!("existing row updated in place");
            Ok(InsertOutcome::AlreadyExists(stored))
        }
    }

    #[instrument(skip(self, user), fields(external_id = %user.external_id))]
    async fn upsert_by_external_id(&self, user: &NewUser) -> RepoResult<User> {
        let candidate = user.clone().into_user();

        let model = sqlx::query_as::<_, UserModel>(&format!(
            r"
            INSERT INTO users (id, external_id, email, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (external_id) DO UPDATE
            SET email = EXCLUDED.email, deleted_at = NULL, updated_at = NOW()
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(candidate.id)
        .bind(&candidate.external_id)
        .bind(&candidate.email)
        .bind(candidate.role.as_str())
        .bind(candidate.created_at)
        .bind(candidate.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        User::try_from(model)
    }

    #[instrument(skip(self))]
    async fn soft_delete_by_external_id(&self, external_id: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE external_id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(external_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn count(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }
}
