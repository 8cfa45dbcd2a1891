//! # hub-service
//!
//! Application layer: the identity reconciler, guarded mutation handlers,
//! audit emission, admin queries, provisioning, and DTOs.

pub mod dto;
pub mod services;
pub mod storage;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use dto::{
    AdminOverview, AuditEntryResponse, AuditQuery, CreateProjectRequest, FileResponse,
    HealthResponse, IdentityWebhookEvent, ProjectDetail, ProjectResponse, ProjectSummary,
    ProjectWithOwnerResponse, ReadinessResponse, SaveFileRequest, UpdateProjectStatusRequest,
    UploadQuery, UserResponse, UserStatusResponse, WebhookAck,
};
pub use services::{
    AdminService, AuditService, FileService, IdentityService, ProjectService,
    ProvisioningOutcome, ProvisioningService, Resolution, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, SharedSecretVerifier, UploadPolicy, WebhookVerifier,
};
pub use storage::LocalObjectStorage;
