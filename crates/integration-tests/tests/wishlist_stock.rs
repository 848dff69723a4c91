//! Wishlist scenarios: uniqueness, stock-status derivation against
//! catalog refreshes and share-token provisioning.

use ambra_core::{StockStatus, UserId, WishlistPrivacy};
use ambra_integration_tests::TestContext;
use ambra_integration_tests::fixtures::product;
use ambra_storefront::services::ShareOwner;

#[test]
fn test_repeat_add_keeps_a_single_entry() {
    let ctx = TestContext::new();
    let wishlist = ctx.wishlist();
    let amber = product("amber-oud", "350");

    assert!(wishlist.add(&amber));
    assert!(!wishlist.add(&amber));

    let items = wishlist.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].product_id, amber.id);
}

#[test]
fn test_stock_status_follows_catalog_refresh() {
    let ctx = TestContext::new();
    let wishlist = ctx.wishlist();

    // Out of stock at add time.
    let mut amber = product("amber-oud", "350");
    amber.in_stock = false;
    amber.stock_quantity = 0;
    wishlist.add(&amber);
    assert_eq!(wishlist.items()[0].status, StockStatus::OutOfStock);

    // The catalog later marks it back in stock with five units left;
    // below the low-stock threshold of ten.
    amber.in_stock = true;
    amber.stock_quantity = 5;
    wishlist.recompute_stock_status(std::slice::from_ref(&amber));
    assert_eq!(wishlist.items()[0].status, StockStatus::LowStock);

    // Restocked fully.
    amber.stock_quantity = 80;
    wishlist.recompute_stock_status(std::slice::from_ref(&amber));
    assert_eq!(wishlist.items()[0].status, StockStatus::InStock);
}

#[test]
fn test_wishlist_survives_a_new_session() {
    let ctx = TestContext::new();
    {
        let wishlist = ctx.wishlist();
        wishlist.add(&product("amber-oud", "350"));
        wishlist.add(&product("midnight-rose", "180"));
    }

    let reopened = ctx.wishlist();
    assert_eq!(reopened.items().len(), 2);
}

#[test]
fn test_going_shared_provisions_a_token_once() {
    let ctx = TestContext::new();
    let wishlist = ctx.wishlist();
    let owner = ShareOwner::User(UserId::new("uid-7"));

    wishlist.set_privacy(WishlistPrivacy::Shared, &owner);
    let first = wishlist.share_token(&owner);

    wishlist.set_privacy(WishlistPrivacy::Public, &owner);
    let second = wishlist.share_token(&owner);

    assert_eq!(first, second);
    assert!(!first.token.is_empty());

    // The token survives a new session alongside the list.
    let reopened = ctx.wishlist();
    assert_eq!(reopened.privacy(), WishlistPrivacy::Public);
    assert_eq!(reopened.share_token(&owner), first);
}

#[test]
fn test_declined_clear_changes_nothing() {
    let ctx = TestContext::new();
    let wishlist = ctx.wishlist();
    wishlist.add(&product("amber-oud", "350"));

    ctx.confirmer.set_answer(false);
    assert!(!wishlist.clear());
    assert_eq!(wishlist.items().len(), 1);
}
