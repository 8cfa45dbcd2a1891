//! Identity-provider session tokens
//!
//! The provider signs a short-lived HS256 token per session. Verifying it yields
//! the provider's subject id and, when known, the user's primary email.

use chrono::{Duration, Utc};
use hub_core::ExternalIdentity;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Session token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Provider subject id
    pub sub: String,
    /// Primary email address, absent for accounts without one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl IdentityClaims {
    /// Claims for `subject` valid for `ttl_seconds` from now
    #[must_use]
    pub fn new(subject: impl Into<String>, email: Option<String>, ttl_seconds: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.into(),
            email,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
            iss: None,
        }
    }

    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.iss = Some(issuer.into());
        self
    }
}

/// Verifies session tokens into [`ExternalIdentity`] values
#[derive(Clone)]
pub struct IdentityVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: Option<String>,
}

impl IdentityVerifier {
    #[must_use]
    pub fn new(secret: &str, issuer: Option<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// Decode and validate a token
    ///
    /// # Errors
    /// `TokenExpired` for an expired token, `InvalidToken` for anything else that fails
    pub fn decode_claims(&self, token: &str) -> Result<IdentityClaims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        let data = decode::<IdentityClaims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            },
        )?;

        Ok(data.claims)
    }

    /// Verify a token and extract the identity it vouches for
    ///
    /// # Errors
    /// Same as [`Self::decode_claims`]; an empty subject is also `InvalidToken`
    pub fn verify(&self, token: &str) -> Result<ExternalIdentity, AppError> {
        let claims = self.decode_claims(token)?;
        if claims.sub.trim().is_empty() {
            return Err(AppError::InvalidToken);
        }
        Ok(ExternalIdentity::new(claims.sub, claims.email))
    }

    /// Sign claims with the shared secret (local tooling and tests)
    ///
    /// # Errors
    /// Returns an error if encoding fails
    pub fn issue(&self, claims: &IdentityClaims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to encode token: {e}")))
    }
}

impl std::fmt::Debug for IdentityVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityVerifier")
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}
