//! Exchange-rate scenarios: the staleness window, cache fallback and
//! conversion round trips.

use rust_decimal::Decimal;

use ambra_core::CurrencyCode;
use ambra_integration_tests::TestContext;
use ambra_storefront::error::StoreError;

fn code(s: &str) -> CurrencyCode {
    CurrencyCode::parse(s).expect("test code")
}

#[tokio::test]
async fn test_second_fetch_inside_window_stays_local() {
    let ctx = TestContext::new();
    ctx.rates.set_rates(&[("AED", "3.6725"), ("KWD", "0.3075")]);
    let currency = ctx.currency("USD");

    let first = currency.rates().await.expect("first fetch");
    assert_eq!(ctx.rates.call_count(), 1);

    // Within the one-hour window: zero remote calls, identical values.
    let second = currency.rates().await.expect("second fetch");
    assert_eq!(ctx.rates.call_count(), 1);
    assert_eq!(second.rates, first.rates);
    assert_eq!(second.fetched_at, first.fetched_at);
}

#[tokio::test]
async fn test_fetched_table_overrides_builtin_seed() {
    let ctx = TestContext::new();
    // The remote disagrees with the built-in multiplier; once fetched it
    // is authoritative.
    ctx.rates.set_rates(&[("AED", "3.70")]);
    let currency = ctx.currency("USD");
    currency.rates().await.expect("fetch");

    let converted = currency
        .convert(Decimal::from(100), &code("USD"), &code("AED"))
        .expect("convert");
    assert_eq!(converted, "370".parse().expect("decimal"));
}

#[tokio::test]
async fn test_outage_with_stale_snapshot_serves_it_flagged() {
    use ambra_storefront::local::{LocalStore, keys};
    use ambra_storefront::models::currency::RateTable;

    let ctx = TestContext::new();
    ctx.rates.set_rates(&[("AED", "3.6725")]);
    ctx.currency("USD").rates().await.expect("first fetch");

    // Age the persisted snapshot past the staleness window, then take the
    // provider down.
    let raw = ctx.local.read(keys::CACHED_RATES).expect("snapshot persisted");
    let mut table: RateTable = serde_json::from_str(&raw).expect("snapshot parses");
    table.fetched_at = chrono::Utc::now() - chrono::TimeDelta::hours(2);
    ctx.local
        .write(
            keys::CACHED_RATES,
            &serde_json::to_string(&table).expect("snapshot serializes"),
        )
        .expect("snapshot rewrite");
    ctx.rates.set_unavailable(true);

    let offline = ctx.currency("USD");
    let served = offline.rates().await.expect("stale cache is served");
    assert!(served.stale);
    assert_eq!(
        served.rate_for(&code("AED")),
        Some("3.6725".parse().expect("decimal"))
    );
    assert!(ctx.notifier.saw("out of date"));
}

#[tokio::test]
async fn test_outage_with_no_cache_is_a_hard_error() {
    let ctx = TestContext::new();
    ctx.rates.set_unavailable(true);

    let currency = ctx.currency("USD");
    let result = currency.rates().await;
    assert!(matches!(result, Err(StoreError::Transient(_))));
    assert!(ctx.notifier.saw("exchange rates"));
}

#[tokio::test]
async fn test_round_trip_conversion_is_lossless_within_tolerance() {
    let ctx = TestContext::new();
    ctx.rates
        .set_rates(&[("AED", "3.6725"), ("KWD", "0.3075"), ("EUR", "0.92")]);
    let currency = ctx.currency("USD");
    currency.rates().await.expect("fetch");

    let tolerance: Decimal = "0.0001".parse().expect("decimal");
    for amount in ["1", "19.99", "349.5", "12500"] {
        let amount: Decimal = amount.parse().expect("decimal");
        for target in ["AED", "KWD", "EUR"] {
            let there = currency
                .convert(amount, &code("USD"), &code(target))
                .expect("convert out");
            let back = currency
                .convert(there, &code(target), &code("USD"))
                .expect("convert back");
            assert!(
                (back - amount).abs() < tolerance,
                "{amount} -> {target} -> {back}"
            );
        }
    }
}

#[tokio::test]
async fn test_cross_currency_conversion_goes_through_base() {
    let ctx = TestContext::new();
    ctx.rates.set_rates(&[("AED", "3.6725"), ("SAR", "3.75")]);
    let currency = ctx.currency("USD");
    currency.rates().await.expect("fetch");

    // 375 SAR -> 100 USD -> 367.25 AED
    let converted = currency
        .convert(Decimal::from(375), &code("SAR"), &code("AED"))
        .expect("convert");
    let expected: Decimal = "367.25".parse().expect("decimal");
    let tolerance: Decimal = "0.0001".parse().expect("decimal");
    assert!((converted - expected).abs() < tolerance);
}

#[tokio::test]
async fn test_switcher_lists_gulf_luxury_currencies() {
    let ctx = TestContext::new();
    let currency = ctx.currency("USD");

    let supported = currency.supported();
    assert!(supported.iter().any(|c| c.code.as_str() == "KWD" && c.luxury));
    assert!(supported.iter().any(|c| c.code.as_str() == "USD" && !c.luxury));

    // Preference round trip through the durable store.
    currency.set_active_currency(&code("KWD"));
    assert_eq!(ctx.currency("USD").active_currency(), code("KWD"));
}

#[tokio::test]
async fn test_unsupported_currency_is_rejected() {
    let ctx = TestContext::new();
    let currency = ctx.currency("USD");

    let result = currency.convert(Decimal::ONE, &code("USD"), &code("XXX"));
    match result {
        Err(StoreError::Validation(message)) => {
            assert!(message.contains("unsupported currency"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}
