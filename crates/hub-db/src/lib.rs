//! # hub-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management and schema bootstrap
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hub_core::UserRepository;
//! use hub_db::{apply_schema, create_pool, PgUserRepository, PoolConfig};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::from_env()).await?;
//!     apply_schema(&pool).await?;
//!     let users = PgUserRepository::new(pool);
//!     let total = users.count().await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{apply_schema, create_pool, create_pool_from_env, PgPool, PoolConfig};
pub use repositories::{
    PgAuditLogRepository, PgFileRepository, PgProjectRepository, PgUserRepository,
};
