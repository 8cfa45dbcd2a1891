//! Project model -> entity mappers

use hub_core::{DomainError, Project, ProjectStatus, ProjectWithOwner};

use super::corrupt_column;
use crate::models::{ProjectModel, ProjectWithCountModel, ProjectWithOwnerModel};

impl TryFrom<ProjectModel> for Project {
    type Error = DomainError;

    fn try_from(model: ProjectModel) -> Result<Self, Self::Error> {
        let status: ProjectStatus = model
            .status
            .parse()
            .map_err(|e| corrupt_column("projects.status", e))?;

        Ok(Project {
            id: model.id,
            owner_id: model.owner_id,
            name: model.name,
            status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// `(project, file_count)` pair
pub struct ProjectCount(pub Project, pub i64);

impl TryFrom<ProjectWithCountModel> for ProjectCount {
    type Error = DomainError;

    fn try_from(model: ProjectWithCountModel) -> Result<Self, Self::Error> {
        Ok(Self(Project::try_from(model.project)?, model.file_count))
    }
}

impl TryFrom<ProjectWithOwnerModel> for ProjectWithOwner {
    type Error = DomainError;

    fn try_from(model: ProjectWithOwnerModel) -> Result<Self, Self::Error> {
        Ok(ProjectWithOwner {
            project: Project::try_from(model.project)?,
            owner_email: model.owner_email,
            file_count: model.file_count,
        })
    }
}
