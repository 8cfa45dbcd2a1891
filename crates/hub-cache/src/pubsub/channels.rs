//! Pub/Sub channel definitions.

use hub_core::StaleView;

/// Pub/Sub channel types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PubSubChannel {
    /// Renderers of one view listen here
    View(StaleView),
    /// Custom channel name
    Custom(String),
}

impl PubSubChannel {
    #[must_use]
    pub fn view(view: StaleView) -> Self {
        Self::View(view)
    }

    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Get the Redis channel name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::View(view) => view.channel_name(),
            Self::Custom(name) => name.clone(),
        }
    }
}

impl std::fmt::Display for PubSubChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}
