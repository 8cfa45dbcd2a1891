//! Redis Pub/Sub publisher.

use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

use crate::pool::{RedisPool, RedisResult};
use crate::pubsub::PubSubChannel;

/// Event type sent when a view must be re-rendered
pub const VIEW_STALE_EVENT: &str = "VIEW_STALE";

/// Event wrapper for Pub/Sub messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubSubEvent {
    pub event_type: String,
    pub data: serde_json::Value,
    pub emitted_at: DateTime<Utc>,
}

impl PubSubEvent {
    #[must_use]
    pub fn new(event_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
            emitted_at: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Redis Pub/Sub publisher
#[derive(Clone)]
pub struct Publisher {
    pool: RedisPool,
}

impl Publisher {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Publish an event to a channel, returning the number of receivers
    pub async fn publish(&self, channel: &PubSubChannel, event: &PubSubEvent) -> RedisResult<u32> {
        let mut conn = self.pool.get().await?;
        let channel_name = channel.name();
        let payload = event.to_json()?;

        let receivers: u32 = conn.publish(&channel_name, &payload).await?;

        tracing::debug!(
            channel = %channel_name,
            event_type = %event.event_type,
            receivers = receivers,
            "Published event"
        );

        Ok(receivers)
    }

    /// Publish one event per channel over a single connection
    pub async fn publish_each(
        &self,
        events: &[(PubSubChannel, PubSubEvent)],
    ) -> RedisResult<u32> {
        if events.is_empty() {
            return Ok(0);
        }

        let mut conn = self.pool.get().await?;
        let mut total_receivers = 0;

        for (channel, event) in events {
            let payload = event.to_json()?;
            let receivers: u32 = conn.publish(channel.name(), &payload).await?;
            total_receivers += receivers;
        }

        tracing::debug!(
            channels = events.len(),
            total_receivers = total_receivers,
            "Published events to multiple channels"
        );

        Ok(total_receivers)
    }
}
