//! Catalog product model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ambra_core::{Concentration, LocalizedText, NoteLayer, ProductId};

/// The three note layers of a fragrance pyramid, top to base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FragranceNotes {
    #[serde(default)]
    pub top: Vec<String>,
    #[serde(default)]
    pub heart: Vec<String>,
    #[serde(default)]
    pub base: Vec<String>,
}

impl FragranceNotes {
    /// Notes for one layer.
    #[must_use]
    pub fn layer(&self, layer: NoteLayer) -> &[String] {
        match layer {
            NoteLayer::Top => &self.top,
            NoteLayer::Heart => &self.heart,
            NoteLayer::Base => &self.base,
        }
    }

    /// Case-insensitive substring match against any note in any layer.
    ///
    /// `needle` must already be lowercased by the caller.
    #[must_use]
    pub fn contains_lower(&self, needle: &str) -> bool {
        [&self.top, &self.heart, &self.base]
            .into_iter()
            .flatten()
            .any(|note| note.to_lowercase().contains(needle))
    }
}

/// A catalog product.
///
/// `slug` is unique across the catalog and `price` is non-negative; both
/// invariants are enforced at the admin write path, so documents read back
/// from the backend can be trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub slug: String,
    pub name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    pub brand: String,
    pub category: String,
    /// Amount in the store's base currency.
    pub price: Decimal,
    /// Bottle size as displayed, e.g. `"100ml"`.
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub concentration: Concentration,
    #[serde(default)]
    pub notes: FragranceNotes,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub bestseller: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub stock_quantity: u32,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub review_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const fn default_in_stock() -> bool {
    true
}

impl Product {
    /// Primary display image, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whether the product can currently be purchased.
    #[must_use]
    pub const fn purchasable(&self) -> bool {
        self.in_stock && self.stock_quantity > 0
    }
}
