//! Cart checkout scenarios: derived totals under the fixed business
//! rules, quantity clamping and persistence across sessions.

use rust_decimal::Decimal;

use ambra_integration_tests::TestContext;
use ambra_integration_tests::fixtures::product;

#[test]
fn test_checkout_totals_above_free_shipping() {
    let ctx = TestContext::new();
    let cart = ctx.cart();

    cart.add_item(&product("amber-oud", "100"), 1);
    cart.add_item(&product("midnight-rose", "150"), 1);

    let totals = cart.totals();
    assert_eq!(totals.subtotal, Decimal::from(250));
    assert_eq!(totals.shipping, Decimal::ZERO);
    assert_eq!(totals.tax, Decimal::new(2000, 2));
    assert_eq!(totals.total, Decimal::from(270));
}

#[test]
fn test_checkout_totals_below_free_shipping() {
    let ctx = TestContext::new();
    let cart = ctx.cart();

    cart.add_item(&product("vetiver-sport", "50"), 1);

    let totals = cart.totals();
    assert_eq!(totals.subtotal, Decimal::from(50));
    assert_eq!(totals.shipping, Decimal::from(15));
    assert_eq!(totals.tax, Decimal::new(400, 2));
    assert_eq!(totals.total, Decimal::from(69));
}

#[test]
fn test_totals_identity_holds_for_any_cart() {
    let ctx = TestContext::new();
    let cart = ctx.cart();

    cart.add_item(&product("a", "74.95"), 3);
    cart.add_item(&product("b", "12.50"), 2);
    cart.add_item(&product("c", "199.99"), 1);

    let totals = cart.totals();
    assert_eq!(totals.total, totals.subtotal + totals.shipping + totals.tax);
}

#[test]
fn test_quantity_clamped_to_business_range() {
    let ctx = TestContext::new();
    let cart = ctx.cart();
    let amber = product("amber-oud", "100");
    cart.add_item(&amber, 1);

    for (requested, stored) in [(0, 1), (1, 1), (5, 5), (10, 10), (11, 10), (250, 10)] {
        cart.set_quantity(&amber.id, requested);
        assert_eq!(cart.items()[0].quantity, stored, "requested {requested}");
    }
}

#[test]
fn test_double_removal_is_idempotent() {
    let ctx = TestContext::new();
    let cart = ctx.cart();
    let amber = product("amber-oud", "100");
    let rose = product("midnight-rose", "150");
    cart.add_item(&amber, 1);
    cart.add_item(&rose, 2);

    cart.remove_item(&amber.id);
    let once = cart.items();
    cart.remove_item(&amber.id);
    let twice = cart.items();

    assert_eq!(once, twice);
    assert_eq!(twice.len(), 1);
    assert_eq!(twice[0].product_id, rose.id);
}

#[test]
fn test_cart_survives_a_new_session() {
    let ctx = TestContext::new();
    {
        let cart = ctx.cart();
        cart.add_item(&product("amber-oud", "100"), 2);
        cart.set_quantity(&product("amber-oud", "100").id, 4);
    }

    // A fresh service over the same local store sees the same lines.
    let reopened = ctx.cart();
    let items = reopened.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 4);
    assert_eq!(reopened.totals().subtotal, Decimal::from(400));
}

#[test]
fn test_declined_clear_changes_nothing() {
    let ctx = TestContext::new();
    let cart = ctx.cart();
    cart.add_item(&product("amber-oud", "100"), 1);

    ctx.confirmer.set_answer(false);
    assert!(!cart.clear());
    assert_eq!(cart.item_count(), 1);

    ctx.confirmer.set_answer(true);
    assert!(cart.clear());
    assert_eq!(cart.item_count(), 0);
}
