//! Access policy - the pure ownership/role guard applied before every mutation
//!
//! Nothing here performs I/O. Callers load the project in the same request and
//! pass it in; the decision is never cached.

use thiserror::Error;

use crate::entities::{Project, User};

/// Outcome of an access check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny,
}

impl AccessDecision {
    #[inline]
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Why a project could not be accessed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("Project not found")]
    NotFound,

    #[error("Access denied")]
    Forbidden,
}

/// Owners and admins may act on a project; nobody else
pub fn authorize(user: &User, project: &Project) -> AccessDecision {
    if project.owner_id == user.id || user.role.is_admin() {
        AccessDecision::Allow
    } else {
        AccessDecision::Deny
    }
}

/// Guard a freshly loaded project, yielding it back when access is allowed
pub fn check_project_access(user: &User, project: Option<Project>) -> Result<Project, AccessError> {
    let project = project.ok_or(AccessError::NotFound)?;
    match authorize(user, &project) {
        AccessDecision::Allow => Ok(project),
        AccessDecision::Deny => Err(AccessError::Forbidden),
    }
}

/// Admin-only views
pub fn require_admin(user: &User) -> AccessDecision {
    if user.role.is_admin() {
        AccessDecision::Allow
    } else {
        AccessDecision::Deny
    }
}
