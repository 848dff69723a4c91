//! Wishlist service.

use std::sync::{Arc, Mutex};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng as _;
use serde::{Deserialize, Serialize};
use tracing::warn;

use ambra_core::{ProductId, SessionId, UserId, WishlistPrivacy};

use crate::local::{LocalStore, keys};
use crate::models::product::Product;
use crate::models::wishlist::{WishlistItem, stock_status_of};
use crate::ports::ux::{Confirmer, Notifier, Severity};

/// Who a share token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ShareOwner {
    /// An authenticated customer.
    User(UserId),
    /// An anonymous browser session.
    Anonymous(SessionId),
}

/// An opaque shareable identifier bound to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareToken {
    pub token: String,
    pub owner: ShareOwner,
}

/// The persisted wishlist blob.
#[derive(Debug, Default, Serialize, Deserialize)]
struct WishlistSnapshot {
    items: Vec<WishlistItem>,
    #[serde(default)]
    privacy: WishlistPrivacy,
    #[serde(default)]
    share: Option<ShareToken>,
}

/// Owns the wishlist: a set of product snapshots unique by product id,
/// with derived stock status and a shareable identity.
pub struct WishlistService {
    local: Arc<dyn LocalStore>,
    confirmer: Arc<dyn Confirmer>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<WishlistSnapshot>,
}

impl WishlistService {
    /// Create the service, rehydrating the persisted list.
    pub fn new(
        local: Arc<dyn LocalStore>,
        confirmer: Arc<dyn Confirmer>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let snapshot = local
            .read(keys::WISHLIST)
            .and_then(|raw| match serde_json::from_str(&raw) {
                Ok(snapshot) => Some(snapshot),
                Err(err) => {
                    warn!(error = %err, "discarding unreadable persisted wishlist");
                    None
                }
            })
            .unwrap_or_default();

        Self {
            local,
            confirmer,
            notifier,
            state: Mutex::new(snapshot),
        }
    }

    /// Add a product. Returns `false` (and notifies) if it is already
    /// wishlisted.
    pub fn add(&self, product: &Product) -> bool {
        {
            let mut state = self.lock();
            if state
                .items
                .iter()
                .any(|item| item.product_id == product.id)
            {
                drop(state);
                self.notifier
                    .notify(Severity::Warning, "Already in your wishlist");
                return false;
            }
            state.items.push(WishlistItem::snapshot(product));
            self.mirror(&state);
        }
        self.notifier.notify(Severity::Success, "Saved to wishlist");
        true
    }

    /// Remove a product by id. Returns whether anything was removed.
    pub fn remove(&self, id: &ProductId) -> bool {
        let mut state = self.lock();
        let before = state.items.len();
        state.items.retain(|item| item.product_id != *id);
        let removed = state.items.len() != before;
        if removed {
            self.mirror(&state);
        }
        removed
    }

    /// Add the product if absent, remove it if present.
    pub fn toggle(&self, product: &Product) {
        if self.contains(&product.id) {
            self.remove(&product.id);
        } else {
            self.add(product);
        }
    }

    /// Whether a product id is wishlisted.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.lock().items.iter().any(|item| item.product_id == *id)
    }

    /// Empty the list after user confirmation. Declining leaves it
    /// untouched. Returns whether the list was cleared.
    pub fn clear(&self) -> bool {
        if !self.confirmer.confirm("Remove every item from your wishlist?") {
            return false;
        }
        {
            let mut state = self.lock();
            state.items.clear();
            self.mirror(&state);
        }
        self.notifier.notify(Severity::Info, "Wishlist cleared");
        true
    }

    /// Re-derive every item's stock status from fresh catalog data.
    ///
    /// An item whose product vanished from the catalog reads as out of
    /// stock.
    pub fn recompute_stock_status(&self, catalog: &[Product]) {
        let mut state = self.lock();
        for item in &mut state.items {
            item.status = catalog
                .iter()
                .find(|product| product.id == item.product_id)
                .map_or(ambra_core::StockStatus::OutOfStock, stock_status_of);
        }
        self.mirror(&state);
    }

    /// The current entries, in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<WishlistItem> {
        self.lock().items.clone()
    }

    /// The current privacy level.
    #[must_use]
    pub fn privacy(&self) -> WishlistPrivacy {
        self.lock().privacy
    }

    /// Change the privacy level. Entering a non-private state provisions
    /// a share token for `owner` if none exists yet.
    pub fn set_privacy(&self, privacy: WishlistPrivacy, owner: &ShareOwner) {
        let mut state = self.lock();
        state.privacy = privacy;
        if privacy != WishlistPrivacy::Private && state.share.is_none() {
            state.share = Some(ShareToken {
                token: generate_token(),
                owner: owner.clone(),
            });
        }
        self.mirror(&state);
    }

    /// The shareable identifier, provisioning one bound to `owner` on
    /// first use.
    pub fn share_token(&self, owner: &ShareOwner) -> ShareToken {
        let mut state = self.lock();
        if let Some(share) = &state.share {
            return share.clone();
        }
        let share = ShareToken {
            token: generate_token(),
            owner: owner.clone(),
        };
        state.share = Some(share.clone());
        self.mirror(&state);
        share
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, WishlistSnapshot> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn mirror(&self, snapshot: &WishlistSnapshot) {
        match serde_json::to_string(snapshot) {
            Ok(raw) => {
                if let Err(err) = self.local.write(keys::WISHLIST, &raw) {
                    warn!(error = %err, "failed to mirror wishlist");
                }
            }
            Err(err) => warn!(error = %err, "failed to serialize wishlist"),
        }
    }
}

/// An opaque URL-safe token from 16 random bytes.
fn generate_token() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    URL_SAFE_NO_PAD.encode(bytes)
}
