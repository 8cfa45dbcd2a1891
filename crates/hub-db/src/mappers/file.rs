//! File model -> entity mapper

use hub_core::{DomainError, FileAttachment};

use crate::models::FileModel;

impl TryFrom<FileModel> for FileAttachment {
    type Error = DomainError;

    fn try_from(model: FileModel) -> Result<Self, Self::Error> {
        Ok(FileAttachment {
            id: model.id,
            project_id: model.project_id,
            file_name: model.file_name,
            url: model.url,
            size: model.size,
            uploaded_at: model.uploaded_at,
        })
    }
}
