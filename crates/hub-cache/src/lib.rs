//! # hub-cache
//!
//! Redis layer used to tell renderers which views went stale after a mutation.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Pub/Sub**: `VIEW_STALE` events published per view channel
//! - **Invalidators**: [`hub_core::ViewInvalidator`] backed by Redis, or by logs alone
//!
//! ## Example
//!
//! ```ignore
//! use hub_cache::{RedisPool, RedisPoolConfig, RedisViewInvalidator};
//! use hub_core::{StaleView, ViewInvalidator};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let invalidator = RedisViewInvalidator::new(pool);
//! invalidator.invalidate(&[StaleView::Admin]).await?;
//! ```

pub mod invalidation;
pub mod pool;
pub mod pubsub;

pub use invalidation::{LoggingViewInvalidator, RedisViewInvalidator};
pub use pool::{
    create_shared_pool, RedisPool, RedisPoolConfig, RedisPoolError, RedisResult, SharedRedisPool,
};
pub use pubsub::{PubSubChannel, PubSubEvent, Publisher, VIEW_STALE_EVENT};
