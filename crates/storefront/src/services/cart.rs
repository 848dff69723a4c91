//! Shopping cart service.

use std::sync::{Arc, Mutex};

use tracing::warn;

use ambra_core::ProductId;

use crate::local::{LocalStore, keys};
use crate::models::cart::{CartItem, CartTotals, MAX_QUANTITY, MIN_QUANTITY};
use crate::models::product::Product;
use crate::ports::ux::{Confirmer, Notifier, Severity};

struct CartState {
    items: Vec<CartItem>,
    /// Drives the slide-out cart panel; set on every add.
    open: bool,
}

/// Owns the cart lines and their derived totals.
///
/// Every mutation mirrors the full item list to the durable local store;
/// the constructor rehydrates from it. There is no remote cart storage.
pub struct CartService {
    local: Arc<dyn LocalStore>,
    confirmer: Arc<dyn Confirmer>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<CartState>,
}

impl CartService {
    /// Create the service, rehydrating persisted lines.
    pub fn new(
        local: Arc<dyn LocalStore>,
        confirmer: Arc<dyn Confirmer>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let items = local
            .read(keys::CART)
            .and_then(|raw| match serde_json::from_str(&raw) {
                Ok(items) => Some(items),
                Err(err) => {
                    warn!(error = %err, "discarding unreadable persisted cart");
                    None
                }
            })
            .unwrap_or_default();

        Self {
            local,
            confirmer,
            notifier,
            state: Mutex::new(CartState { items, open: false }),
        }
    }

    /// Add a product, merging into an existing line for the same id.
    ///
    /// A repeat add increments the existing quantity without clamping;
    /// [`Self::set_quantity`] applies the clamp. Marks the cart open.
    pub fn add_item(&self, product: &Product, quantity: u32) {
        {
            let mut state = self.lock();
            match state
                .items
                .iter_mut()
                .find(|item| item.product_id == product.id)
            {
                Some(item) => item.quantity += quantity,
                None => state.items.push(CartItem::snapshot(product, quantity)),
            }
            state.open = true;
            self.mirror(&state.items);
        }
        self.notifier.notify(Severity::Success, "Added to cart");
    }

    /// Remove a line. Removing an absent id is a no-op, not an error.
    pub fn remove_item(&self, id: &ProductId) {
        let mut state = self.lock();
        let before = state.items.len();
        state.items.retain(|item| item.product_id != *id);
        if state.items.len() != before {
            self.mirror(&state.items);
        }
    }

    /// Set a line's quantity, clamped to the allowed range. Silently
    /// no-ops when the line is absent.
    pub fn set_quantity(&self, id: &ProductId, quantity: u32) {
        let mut state = self.lock();
        if let Some(item) = state.items.iter_mut().find(|item| item.product_id == *id) {
            item.quantity = quantity.clamp(MIN_QUANTITY, MAX_QUANTITY);
            self.mirror(&state.items);
        }
    }

    /// Empty the cart after user confirmation. Declining leaves the cart
    /// untouched. Returns whether the cart was cleared.
    pub fn clear(&self) -> bool {
        if !self.confirmer.confirm("Remove every item from your cart?") {
            return false;
        }
        {
            let mut state = self.lock();
            state.items.clear();
            self.mirror(&state.items);
        }
        self.notifier.notify(Severity::Info, "Cart cleared");
        true
    }

    /// The current lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.lock().items.clone()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lock().items.iter().map(|item| item.quantity).sum()
    }

    /// Derived amounts, recomputed on every call.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        CartTotals::compute(&self.lock().items)
    }

    /// Whether the cart panel should be showing.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    /// Dismiss the cart panel.
    pub fn close(&self) {
        self.lock().open = false;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CartState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn mirror(&self, items: &[CartItem]) {
        match serde_json::to_string(items) {
            Ok(raw) => {
                if let Err(err) = self.local.write(keys::CART, &raw) {
                    warn!(error = %err, "failed to mirror cart");
                }
            }
            Err(err) => warn!(error = %err, "failed to serialize cart"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::testing::{MemoryLocalStore, RecordingNotifier, StaticConfirmer, product};
    use rust_decimal::Decimal;

    fn service_with(confirm: bool) -> (CartService, Arc<MemoryLocalStore>) {
        let local = Arc::new(MemoryLocalStore::default());
        let service = CartService::new(
            local.clone(),
            Arc::new(StaticConfirmer(confirm)),
            Arc::new(RecordingNotifier::default()),
        );
        (service, local)
    }

    #[test]
    fn test_add_item_merges_by_product_id() {
        let (cart, _) = service_with(true);
        let amber = product("amber-oud", "100");

        cart.add_item(&amber, 1);
        cart.add_item(&amber, 2);

        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 3);
        assert!(cart.is_open());

        cart.close();
        assert!(!cart.is_open());
    }

    #[test]
    fn test_remove_item_is_idempotent() {
        let (cart, _) = service_with(true);
        let amber = product("amber-oud", "100");
        cart.add_item(&amber, 1);

        cart.remove_item(&amber.id);
        let after_first = cart.items();
        cart.remove_item(&amber.id);

        assert!(after_first.is_empty());
        assert_eq!(cart.items(), after_first);
    }

    #[test]
    fn test_set_quantity_clamps_to_range() {
        let (cart, _) = service_with(true);
        let amber = product("amber-oud", "100");
        cart.add_item(&amber, 1);

        cart.set_quantity(&amber.id, 99);
        assert_eq!(cart.items()[0].quantity, MAX_QUANTITY);

        cart.set_quantity(&amber.id, 0);
        assert_eq!(cart.items()[0].quantity, MIN_QUANTITY);

        cart.set_quantity(&amber.id, 7);
        assert_eq!(cart.items()[0].quantity, 7);
    }

    #[test]
    fn test_set_quantity_on_absent_line_is_noop() {
        let (cart, _) = service_with(true);
        cart.set_quantity(&ProductId::new("ghost"), 5);
        assert!(cart.items().is_empty());
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let (cart, _) = service_with(false);
        cart.add_item(&product("amber-oud", "100"), 1);

        assert!(!cart.clear());
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_clear_confirmed_empties_cart() {
        let (cart, _) = service_with(true);
        cart.add_item(&product("amber-oud", "100"), 1);

        assert!(cart.clear());
        assert!(cart.items().is_empty());
    }

    #[test]
    fn test_persisted_cart_rehydrates() {
        let (cart, local) = service_with(true);
        cart.add_item(&product("amber-oud", "100"), 2);

        let reopened = CartService::new(
            local,
            Arc::new(StaticConfirmer(true)),
            Arc::new(RecordingNotifier::default()),
        );
        let items = reopened.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].unit_price, Decimal::from(100));
        // The open flag is UI state and never persists.
        assert!(!reopened.is_open());
    }

    #[test]
    fn test_totals_recompute_on_read() {
        let (cart, _) = service_with(true);
        cart.add_item(&product("amber-oud", "100"), 1);
        assert_eq!(cart.totals().shipping, Decimal::from(15));

        cart.add_item(&product("midnight-rose", "150"), 1);
        assert_eq!(cart.totals().shipping, Decimal::ZERO);
        assert_eq!(cart.totals().total, Decimal::from(270));
    }
}
