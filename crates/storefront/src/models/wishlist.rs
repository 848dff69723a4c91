//! Wishlist entries with derived stock status.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ambra_core::{LocalizedText, ProductId, StockStatus};

use super::product::{FragranceNotes, Product};

/// Remaining quantity below which a purchasable product reads as low stock.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Derive a product's stock status from current catalog data.
#[must_use]
pub fn stock_status_of(product: &Product) -> StockStatus {
    if !product.purchasable() {
        StockStatus::OutOfStock
    } else if product.stock_quantity < LOW_STOCK_THRESHOLD {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    }
}

/// A wishlisted product snapshot, unique by product id.
///
/// `status` is derived, never authoritative: it is recomputed against the
/// catalog whenever catalog data refreshes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub product_id: ProductId,
    pub slug: String,
    pub name: LocalizedText,
    pub brand: String,
    /// Price in the store's base currency, captured at add-time.
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub notes: FragranceNotes,
    pub status: StockStatus,
    pub added_at: DateTime<Utc>,
}

impl WishlistItem {
    /// Snapshot a product into a wishlist entry, deriving its stock status.
    #[must_use]
    pub fn snapshot(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            slug: product.slug.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            price: product.price,
            image: product.primary_image().map(str::to_owned),
            notes: product.notes.clone(),
            status: stock_status_of(product),
            added_at: Utc::now(),
        }
    }
}
