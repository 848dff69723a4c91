//! Hosted authentication provider port.

use async_trait::async_trait;
use thiserror::Error;

use ambra_core::{Email, UserId};

/// Errors surfaced by the auth provider.
#[derive(Debug, Error)]
pub enum AuthBackendError {
    /// Wrong email/password pair, or no such account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account exists but has been disabled by the provider.
    #[error("account disabled")]
    Disabled,

    /// The provider could not be reached or returned a server error.
    #[error("auth provider unavailable: {0}")]
    Unavailable(String),
}

/// The principal as the auth provider sees it: a verified identity with no
/// role attached. Role resolution happens against the document backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Provider-issued opaque uid.
    pub uid: UserId,
    /// Verified email address.
    pub email: Email,
    /// Display name, if the account has one set.
    pub display_name: Option<String>,
}

/// Credential verification and account operations.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Verify an email/password pair.
    async fn sign_in(&self, email: &Email, password: &str) -> Result<AuthUser, AuthBackendError>;

    /// Revoke the provider-side session for a uid.
    async fn sign_out(&self, uid: &UserId) -> Result<(), AuthBackendError>;

    /// The currently signed-in principal, if any.
    async fn current_user(&self) -> Result<Option<AuthUser>, AuthBackendError>;

    /// Ask the provider to email a password-reset link.
    async fn send_password_reset(&self, email: &Email) -> Result<(), AuthBackendError>;

    /// Update the display name on the provider-side profile.
    async fn update_display_name(&self, uid: &UserId, name: &str)
    -> Result<(), AuthBackendError>;
}
