//! Value objects - immutable types that represent domain concepts

mod identity;
mod project_status;
mod role;

pub use identity::ExternalIdentity;
pub use project_status::{ProjectStatus, ProjectStatusParseError};
pub use role::{Role, RoleParseError};
