//! User entity - local record mirroring an identity-provider account

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::value_objects::Role;

/// Local user record, keyed externally by the provider's subject id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub external_id: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Data needed to create (or upsert) a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub external_id: String,
    pub email: String,
    pub role: Role,
}

impl NewUser {
    /// A regular user for the given subject and email
    pub fn new(external_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            email: email.into(),
            role: Role::User,
        }
    }

    /// Materialise the record with a fresh id and timestamps
    pub fn into_user(self) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            external_id: self.external_id,
            email: self.email,
            role: self.role,
            created_at: now,
            updated_at: now,
        }
    }
}
