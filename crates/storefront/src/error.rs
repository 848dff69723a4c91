//! Unified error handling for the storefront state layer.
//!
//! Provides the [`StoreError`] taxonomy every service speaks. Validation
//! and not-found conditions are usually resolved locally (`Option`/`bool`
//! returns); access denial always surfaces; transient backend failures on
//! read paths degrade to cached data where a cache exists and surface
//! everywhere else.

use thiserror::Error;

use crate::ports::auth::AuthBackendError;
use crate::ports::documents::DocumentError;
use crate::ports::storage::StorageError;

/// Application-level error type for the storefront state layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed input (e.g. missing required bilingual field).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Missing entity by id or slug.
    #[error("not found: {0}")]
    NotFound(String),

    /// Valid credentials but insufficient role, or a deleted record.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// A remote call failed (network or service outage). Retry is always
    /// user-initiated; in-memory state is left unchanged.
    #[error("service temporarily unavailable: {0}")]
    Transient(String),
}

impl From<DocumentError> for StoreError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::NotFound { collection, id } => Self::NotFound(format!("{collection}/{id}")),
            DocumentError::Malformed { reason, .. } => Self::Validation(reason),
            DocumentError::Unavailable(reason) => Self::Transient(reason),
        }
    }
}

impl From<AuthBackendError> for StoreError {
    fn from(err: AuthBackendError) -> Self {
        match err {
            AuthBackendError::InvalidCredentials | AuthBackendError::Disabled => {
                Self::AccessDenied(err.to_string())
            }
            AuthBackendError::Unavailable(reason) => Self::Transient(reason),
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(path) => Self::NotFound(path),
            StorageError::Unavailable(reason) => Self::Transient(reason),
        }
    }
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;
