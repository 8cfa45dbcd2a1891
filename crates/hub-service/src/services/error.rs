//! Service layer error types
//!
//! Every handler failure is one of these variants. Store-level conflicts from
//! concurrent first sign-ins are absorbed by the reconciler and never appear here.

use hub_common::AppError;
use hub_core::{AccessError, DomainError};
use std::fmt;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// No usable identity could be resolved
    Unauthenticated,

    /// The guard denied the operation
    Forbidden,

    /// Resource not found
    NotFound { resource: &'static str, id: String },

    /// Malformed or out-of-range input, rejected before any write
    InvalidInput(String),

    /// The persistent store failed
    StoreUnavailable(String),

    /// Object storage or the invalidation channel failed
    CollaboratorUnavailable(String),

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "Authentication required"),
            Self::Forbidden => write!(f, "Access denied"),
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Self::StoreUnavailable(msg) => write!(f, "Store unavailable: {msg}"),
            Self::CollaboratorUnavailable(msg) => write!(f, "Collaborator unavailable: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl ServiceError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Map a guard failure on a project to a service error
    pub fn from_access(err: AccessError, project_id: impl fmt::Display) -> Self {
        match err {
            AccessError::NotFound => Self::not_found("Project", project_id.to_string()),
            AccessError::Forbidden => Self::Forbidden,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthenticated => 401,
            Self::Forbidden => 403,
            Self::NotFound { .. } => 404,
            Self::InvalidInput(_) => 400,
            Self::StoreUnavailable(_) | Self::CollaboratorUnavailable(_) => 503,
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "ACCESS_DENIED",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::CollaboratorUnavailable(_) => "COLLABORATOR_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::ProjectNotFound(id) => Self::not_found("Project", id.to_string()),
            DomainError::ValidationError(msg) => Self::InvalidInput(msg),
            DomainError::DatabaseError(msg) => Self::StoreUnavailable(msg),
            DomainError::StorageError(msg) | DomainError::CacheError(msg) => {
                Self::CollaboratorUnavailable(msg)
            }
            // Only the reconciler may see this; anywhere else it is a bug
            DomainError::DuplicateExternalId(id) => {
                Self::Internal(format!("unexpected duplicate external id {id}"))
            }
            DomainError::InternalError(msg) => Self::Internal(msg),
        }
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::InvalidToken | AppError::TokenExpired => Self::Unauthenticated,
            AppError::Database(msg) => Self::StoreUnavailable(msg),
            AppError::Cache(msg) => Self::CollaboratorUnavailable(msg),
            AppError::Domain(e) => e.into(),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
