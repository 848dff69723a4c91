//! Durable local storage.
//!
//! Cart, wishlist, preferences, session snapshots and the offline cache
//! snapshots (catalog, rates) are mirrored here after every mutation and
//! rehydrated at startup. Writers within one process are serialized by the
//! owning service; cross-process consistency is explicitly not guaranteed
//! (last write wins).

mod file_store;

pub use file_store::FileStore;

use thiserror::Error;

/// Well-known storage keys.
pub mod keys {
    pub const CART: &str = "cart";
    pub const WISHLIST: &str = "wishlist";
    pub const LANGUAGE: &str = "language";
    pub const CURRENCY: &str = "currency";
    pub const CACHED_RATES: &str = "cached_rates";
    pub const CACHED_CATALOG: &str = "cached_catalog";
    pub const CUSTOMER_SESSION: &str = "customer_session";
    pub const ADMIN_SESSION: &str = "admin_session";
}

/// Errors surfaced by a [`LocalStore`] write.
#[derive(Debug, Error)]
pub enum LocalStoreError {
    /// The value could not be persisted.
    #[error("local store write failed for {key}: {reason}")]
    WriteFailed {
        /// Storage key being written.
        key: String,
        /// Failure description.
        reason: String,
    },
}

/// Durable string key/value storage.
///
/// Reads treat any failure as absence; a corrupt or unreadable entry is
/// indistinguishable from a missing one. Writes surface their failure so
/// the caller can log it, but a failed mirror never blocks the in-memory
/// mutation that triggered it.
pub trait LocalStore: Send + Sync {
    /// Read the value for a key, `None` if absent or unreadable.
    fn read(&self, key: &str) -> Option<String>;

    /// Write the value for a key.
    ///
    /// # Errors
    ///
    /// Returns [`LocalStoreError::WriteFailed`] if the value could not be
    /// persisted.
    fn write(&self, key: &str, value: &str) -> Result<(), LocalStoreError>;

    /// Remove a key. Removing a missing key is a no-op.
    fn remove(&self, key: &str);
}
