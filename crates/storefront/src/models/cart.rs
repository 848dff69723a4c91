//! Cart line items and derived totals.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use ambra_core::{LocalizedText, ProductId};

use super::product::Product;

/// Lowest quantity a line item can hold.
pub const MIN_QUANTITY: u32 = 1;
/// Highest quantity a line item can hold.
pub const MAX_QUANTITY: u32 = 10;

/// Orders strictly above this subtotal ship free.
const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(200, 0, 0, false, 0);
/// Flat shipping fee below the free-shipping threshold.
const SHIPPING_FLAT: Decimal = Decimal::from_parts(15, 0, 0, false, 0);
/// Tax rate applied to the subtotal (8%).
const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// A cart line: a snapshot of the product at add-time plus a quantity.
///
/// Snapshotting means a later catalog price change does not silently
/// reprice an open cart. At most one line exists per product id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: LocalizedText,
    pub brand: String,
    pub size: String,
    /// Unit price in the store's base currency, captured at add-time.
    pub unit_price: Decimal,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Snapshot a product into a new line with the given quantity.
    #[must_use]
    pub fn snapshot(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            size: product.size.clone(),
            unit_price: product.price,
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Price times quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Derived cart amounts, recomputed on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl CartTotals {
    /// Compute totals for a list of lines.
    ///
    /// `subtotal = Σ price·quantity`; shipping is free strictly above the
    /// threshold, otherwise the flat fee; tax is 8% of the subtotal rounded
    /// to cents (half away from zero); `total` is the sum of the three.
    #[must_use]
    pub fn compute(items: &[CartItem]) -> Self {
        let subtotal: Decimal = items.iter().map(CartItem::line_total).sum();
        let shipping = if subtotal > FREE_SHIPPING_THRESHOLD {
            Decimal::ZERO
        } else {
            SHIPPING_FLAT
        };
        let tax = (subtotal * TAX_RATE)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }
}
