//! View events - signals that a cached read view no longer reflects the store

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A read view that must be re-rendered after a mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "view", content = "id", rename_all = "snake_case")]
pub enum StaleView {
    /// Project list of one owner
    Dashboard(Uuid),
    /// Detail page of one project
    Project(Uuid),
    /// Admin listing and activity feed
    Admin,
}

impl StaleView {
    /// Pub/sub channel name for this view
    pub fn channel_name(&self) -> String {
        match self {
            Self::Dashboard(owner_id) => format!("view:dashboard:{owner_id}"),
            Self::Project(project_id) => format!("view:project:{project_id}"),
            Self::Admin => "view:admin".to_string(),
        }
    }
}

impl fmt::Display for StaleView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.channel_name())
    }
}
