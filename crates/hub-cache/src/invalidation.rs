//! View invalidators - implementations of [`ViewInvalidator`]

use async_trait::async_trait;
use hub_core::{DomainError, RepoResult, StaleView, ViewInvalidator};
use tracing::{debug, instrument};

use crate::pool::{RedisPool, RedisPoolError};
use crate::pubsub::{PubSubChannel, PubSubEvent, Publisher, VIEW_STALE_EVENT};

impl From<RedisPoolError> for DomainError {
    fn from(err: RedisPoolError) -> Self {
        DomainError::CacheError(err.to_string())
    }
}

/// Publishes a `VIEW_STALE` event on each view's channel
#[derive(Clone)]
pub struct RedisViewInvalidator {
    publisher: Publisher,
}

impl RedisViewInvalidator {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self {
            publisher: Publisher::new(pool),
        }
    }

    fn events(views: &[StaleView]) -> RepoResult<Vec<(PubSubChannel, PubSubEvent)>> {
        views
            .iter()
            .map(|view| {
                let data = serde_json::to_value(view)
                    .map_err(|e| DomainError::InternalError(e.to_string()))?;
                Ok((
                    PubSubChannel::view(*view),
                    PubSubEvent::new(VIEW_STALE_EVENT, data),
                ))
            })
            .collect()
    }
}

#[async_trait]
impl ViewInvalidator for RedisViewInvalidator {
    #[instrument(skip(self), fields(count = views.len()))]
    async fn invalidate(&self, views: &[StaleView]) -> RepoResult<()> {
        let events = Self::events(views)?;
        self.publisher.publish_each(&events).await?;
        Ok(())
    }
}

/// Used when no Redis is configured: records the invalidation in the logs only
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingViewInvalidator;

#[async_trait]
impl ViewInvalidator for LoggingViewInvalidator {
    async fn invalidate(&self, views: &[StaleView]) -> RepoResult<()> {
        for view in views {
            debug!(view = %view, "View marked stale");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_events_per_view() {
        let owner = Uuid::new_v4();
        let events =
            RedisViewInvalidator::events(&[StaleView::Dashboard(owner), StaleView::Admin]).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].0.name(), format!("view:dashboard:{owner}"));
        assert_eq!(events[0].1.event_type, VIEW_STALE_EVENT);
        assert_eq!(events[0].1.data["id"], owner.to_string());
        assert_eq!(events[1].0.name(), "view:admin");
    }

    #[tokio::test]
    async fn test_logging_invalidator_never_fails() {
        let invalidator = LoggingViewInvalidator;
        invalidator
            .invalidate(&[StaleView::Admin, StaleView::Project(Uuid::nil())])
            .await
            .unwrap();
    }
}
