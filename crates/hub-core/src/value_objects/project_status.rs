//! Project status - the fixed set of lifecycle states

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Draft,
    Active,
    Completed,
}

impl ProjectStatus {
    /// Every accepted status, in lifecycle order
    pub const ALL: [ProjectStatus; 3] = [Self::Draft, Self::Active, Self::Completed];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when a status string falls outside `{draft, active, completed}`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid project status '{0}', expected one of: draft, active, completed")]
pub struct ProjectStatusParseError(pub String);

impl FromStr for ProjectStatus {
    type Err = ProjectStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(ProjectStatusParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_status_is_draft() {
        assert_eq!(ProjectStatus::default(), ProjectStatus::Draft);
    }

    #[test]
    fn test_parse_accepts_only_known_values() {
        for status in ProjectStatus::ALL {
            assert_eq!(status.as_str().parse::<ProjectStatus>().unwrap(), status);
        }
        assert!("archived".parse::<ProjectStatus>().is_err());
        assert!("".parse::<ProjectStatus>().is_err());
        assert!("ACTIVE".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn test_parse_error_message() {
        let err = "archived".parse::<ProjectStatus>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid project status 'archived', expected one of: draft, active, completed"
        );
    }
}
