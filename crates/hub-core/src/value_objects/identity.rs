//! External identity - what the identity provider vouches for

/// A verified identity from the external provider
///
/// `subject` is the provider's stable user id. `email` is only present when the
/// provider has a primary address on file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    pub subject: String,
    pub email: Option<String>,
}

impl ExternalIdentity {
    /// Create an identity, normalising a blank email to `None`
    pub fn new(subject: impl Into<String>, email: Option<String>) -> Self {
        let email = email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        Self {
            subject: subject.into(),
            email,
        }
    }

    /// Email usable for creating a local record
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
