//! Business logic services
//!
//! Every state-changing operation takes the already-resolved [`hub_core::User`]
//! explicitly, loads what it touches fresh, runs the access policy, writes,
//! then records an audit entry and invalidates affected views.

pub mod admin;
pub mod audit;
pub mod context;
pub mod error;
pub mod file;
pub mod identity;
pub mod project;
pub mod provisioning;

pub use admin::AdminService;
pub use audit::AuditService;
pub use context::{ServiceContext, ServiceContextBuilder, UploadPolicy};
pub use error::{ServiceError, ServiceResult};
pub use file::FileService;
pub use identity::{IdentityService, Resolution};
pub use project::ProjectService;
pub use provisioning::{
    ProvisioningOutcome, ProvisioningService, SharedSecretVerifier, WebhookVerifier,
};
