//! Redis Pub/Sub module.

mod channels;
mod publisher;

pub use channels::PubSubChannel;
pub use publisher::{PubSubEvent, Publisher, VIEW_STALE_EVENT};
