//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    AuditQuery, CreateProjectRequest, EmailAddress, IdentityWebhookEvent, SaveFileRequest,
    UpdateProjectStatusRequest, UploadQuery, WebhookUserData,
};

pub use responses::{
    AdminOverview, AuditEntryResponse, FileResponse, HealthChecks, HealthResponse,
    ProjectDetail, ProjectResponse, ProjectSummary, ProjectWithOwnerResponse, ReadinessResponse,
    UserResponse, UserStatusResponse, WebhookAck,
};
