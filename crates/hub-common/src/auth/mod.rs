//! Identity-provider session tokens

mod identity;

pub use identity::{IdentityClaims, IdentityVerifier};
