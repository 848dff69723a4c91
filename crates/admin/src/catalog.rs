//! Product management.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use ambra_core::{Concentration, LocalizedText, ProductId};
use ambra_storefront::error::{Result, StoreError};
use ambra_storefront::models::product::{FragranceNotes, Product};
use ambra_storefront::ports::documents::{Documents, Query};

use crate::content::validate_slug;

const PRODUCTS_COLLECTION: &str = "products";

/// Editor input for a new or updated product.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub slug: String,
    pub name: LocalizedText,
    pub description: LocalizedText,
    pub brand: String,
    pub category: String,
    pub price: Decimal,
    pub size: String,
    pub concentration: Concentration,
    pub notes: FragranceNotes,
    pub images: Vec<String>,
    pub bestseller: bool,
    pub featured: bool,
    pub in_stock: bool,
    pub stock_quantity: u32,
}

/// Product create/update/delete with the catalog invariants enforced:
/// slugs are unique and prices non-negative.
pub struct CatalogAdmin {
    docs: Arc<dyn Documents>,
}

impl CatalogAdmin {
    /// Create the service.
    pub fn new(docs: Arc<dyn Documents>) -> Self {
        Self { docs }
    }

    /// Create a product, minting its id and timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for a malformed draft or a slug
    /// already in the catalog, [`StoreError::Transient`] when the backend
    /// is unreachable.
    #[instrument(skip(self, draft), fields(slug = %draft.slug))]
    pub async fn create_product(&self, draft: ProductDraft) -> Result<Product> {
        validate_product_draft(&draft)?;
        if self.slug_in_use(&draft.slug, None).await? {
            return Err(StoreError::Validation(format!(
                "product slug already in use: {}",
                draft.slug
            )));
        }

        let now = Utc::now();
        let product = Product {
            id: ProductId::new(Uuid::new_v4().to_string()),
            slug: draft.slug,
            name: draft.name,
            description: draft.description,
            brand: draft.brand,
            category: draft.category,
            price: draft.price,
            size: draft.size,
            concentration: draft.concentration,
            notes: draft.notes,
            images: draft.images,
            bestseller: draft.bestseller,
            featured: draft.featured,
            in_stock: draft.in_stock,
            stock_quantity: draft.stock_quantity,
            rating: 0.0,
            review_count: 0,
            created_at: now,
            updated_at: now,
        };

        self.write_product(&product).await?;
        info!(id = %product.id, "product created");
        Ok(product)
    }

    /// Update a product from a draft, preserving its id, rating and
    /// creation timestamp and stamping `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id,
    /// [`StoreError::Validation`] for a malformed draft or a slug held by
    /// a different product.
    #[instrument(skip(self, draft), fields(id = %id))]
    pub async fn update_product(&self, id: &ProductId, draft: ProductDraft) -> Result<Product> {
        validate_product_draft(&draft)?;
        let existing = self.fetch_product(id).await?;
        if self.slug_in_use(&draft.slug, Some(id)).await? {
            return Err(StoreError::Validation(format!(
                "product slug already in use: {}",
                draft.slug
            )));
        }

        let product = Product {
            id: existing.id,
            slug: draft.slug,
            name: draft.name,
            description: draft.description,
            brand: draft.brand,
            category: draft.category,
            price: draft.price,
            size: draft.size,
            concentration: draft.concentration,
            notes: draft.notes,
            images: draft.images,
            bestseller: draft.bestseller,
            featured: draft.featured,
            in_stock: draft.in_stock,
            stock_quantity: draft.stock_quantity,
            rating: existing.rating,
            review_count: existing.review_count,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        self.write_product(&product).await?;
        info!("product updated");
        Ok(product)
    }

    /// Delete a product. Deleting an unknown id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transient`] when the backend is unreachable.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<()> {
        self.docs.delete(PRODUCTS_COLLECTION, id.as_str()).await?;
        info!("product deleted");
        Ok(())
    }

    /// Toggle the display flags without touching the rest of the record.
    /// `None` leaves a flag as it is.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn set_flags(
        &self,
        id: &ProductId,
        bestseller: Option<bool>,
        featured: Option<bool>,
        in_stock: Option<bool>,
    ) -> Result<Product> {
        let mut product = self.fetch_product(id).await?;
        if let Some(bestseller) = bestseller {
            product.bestseller = bestseller;
        }
        if let Some(featured) = featured {
            product.featured = featured;
        }
        if let Some(in_stock) = in_stock {
            product.in_stock = in_stock;
        }
        product.updated_at = Utc::now();

        self.write_product(&product).await?;
        Ok(product)
    }

    /// Set the remaining stock quantity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    #[instrument(skip(self), fields(id = %id, quantity))]
    pub async fn set_stock_quantity(&self, id: &ProductId, quantity: u32) -> Result<Product> {
        let mut product = self.fetch_product(id).await?;
        product.stock_quantity = quantity;
        product.updated_at = Utc::now();

        self.write_product(&product).await?;
        Ok(product)
    }

    async fn fetch_product(&self, id: &ProductId) -> Result<Product> {
        let raw = self.docs.get(PRODUCTS_COLLECTION, id.as_str()).await?;
        serde_json::from_value(raw).map_err(|err| {
            warn!(error = %err, "stored product does not parse");
            StoreError::Validation(format!("malformed product {id}: {err}"))
        })
    }

    async fn slug_in_use(&self, slug: &str, exclude: Option<&ProductId>) -> Result<bool> {
        let matches = self
            .docs
            .query(
                PRODUCTS_COLLECTION,
                Query::all().where_eq("slug", json!(slug)),
            )
            .await?;
        Ok(matches.into_iter().any(|document| {
            serde_json::from_value::<Product>(document)
                .map(|product| exclude != Some(&product.id))
                .unwrap_or(false)
        }))
    }

    async fn write_product(&self, product: &Product) -> Result<()> {
        let value =
            serde_json::to_value(product).map_err(|err| StoreError::Validation(err.to_string()))?;
        self.docs
            .put(PRODUCTS_COLLECTION, product.id.as_str(), value)
            .await?;
        Ok(())
    }
}

fn validate_product_draft(draft: &ProductDraft) -> Result<()> {
    draft
        .name
        .validate()
        .map_err(|err| StoreError::Validation(format!("name: {err}")))?;
    validate_slug(&draft.slug)?;
    if draft.price < Decimal::ZERO {
        return Err(StoreError::Validation("price cannot be negative".into()));
    }
    if draft.brand.trim().is_empty() {
        return Err(StoreError::Validation("brand cannot be empty".into()));
    }
    Ok(())
}
