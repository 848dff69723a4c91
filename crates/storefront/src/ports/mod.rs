//! Port traits for the external collaborators.
//!
//! Every hard operation is delegated to a hosted backend; these traits are
//! the seams. Services take them as `Arc<dyn …>` so tests can substitute
//! in-memory fakes and production wires in the [`crate::backend`] client.

pub mod auth;
pub mod documents;
pub mod rates;
pub mod storage;
pub mod ux;

pub use auth::{AuthBackend, AuthBackendError, AuthUser};
pub use documents::{Direction, DocumentError, Documents, Predicate, Query};
pub use rates::{RateSource, RateSourceError};
pub use storage::{ObjectStorage, StorageError};
pub use ux::{Confirmer, Notifier, Severity};
