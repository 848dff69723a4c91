//! Object storage port for product and marketing images.

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by the object store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No object exists at this path.
    #[error("object not found: {0}")]
    NotFound(String),

    /// The store could not be reached or rejected the operation.
    #[error("object storage unavailable: {0}")]
    Unavailable(String),
}

/// Upload-by-path and URL retrieval.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload bytes to a path, replacing any existing object.
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Public download URL for an object path.
    async fn download_url(&self, path: &str) -> Result<String, StorageError>;
}
