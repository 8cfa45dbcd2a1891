//! User model -> entity mapper

use hub_core::{DomainError, Role, User};

use super::corrupt_column;
use crate::models::UserModel;

impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        let role: Role = model
            .role
            .parse()
            .map_err(|e| corrupt_column("users.role", e))?;

        Ok(User {
            id: model.id,
            external_id: model.external_id,
            email: model.email,
            role,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
