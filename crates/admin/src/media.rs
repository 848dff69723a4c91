//! Product and marketing image upload.

use std::sync::Arc;

use tracing::{info, instrument};

use ambra_core::ProductId;
use ambra_storefront::error::{Result, StoreError};
use ambra_storefront::ports::storage::ObjectStorage;

/// Image upload with the store's path conventions:
/// `products/{id}/{filename}` and `content/{filename}`.
pub struct MediaService {
    storage: Arc<dyn ObjectStorage>,
}

impl MediaService {
    /// Create the service.
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self { storage }
    }

    /// Upload a product image and return its display URL.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for a non-image payload or an
    /// unsafe filename, [`StoreError::Transient`] when the store is
    /// unreachable.
    #[instrument(skip(self, bytes), fields(product = %product_id, filename = %filename))]
    pub async fn upload_product_image(
        &self,
        product_id: &ProductId,
        filename: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        let filename = sanitize_filename(filename)?;
        validate_image_content_type(content_type)?;

        let path = format!("products/{product_id}/{filename}");
        self.storage.upload(&path, bytes, content_type).await?;
        let url = self.storage.download_url(&path).await?;
        info!("product image uploaded");
        Ok(url)
    }

    /// Upload a marketing image (hero banners, brand tiles) and return
    /// its display URL.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for a non-image payload or an
    /// unsafe filename, [`StoreError::Transient`] when the store is
    /// unreachable.
    #[instrument(skip(self, bytes), fields(filename = %filename))]
    pub async fn upload_content_image(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        let filename = sanitize_filename(filename)?;
        validate_image_content_type(content_type)?;

        let path = format!("content/{filename}");
        self.storage.upload(&path, bytes, content_type).await?;
        let url = self.storage.download_url(&path).await?;
        info!("content image uploaded");
        Ok(url)
    }
}

/// Reject empty names and anything that could escape the upload prefix.
fn sanitize_filename(filename: &str) -> Result<String> {
    let filename = filename.trim();
    if filename.is_empty() {
        return Err(StoreError::Validation("filename cannot be empty".into()));
    }
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return Err(StoreError::Validation(format!(
            "unsafe filename: {filename}"
        )));
    }
    Ok(filename.to_owned())
}

fn validate_image_content_type(content_type: &str) -> Result<()> {
    if content_type.starts_with("image/") {
        Ok(())
    } else {
        Err(StoreError::Validation(format!(
            "expected an image payload, got {content_type}"
        )))
    }
}
