//! Homepage content scenarios: read-through-create, single-section
//! patches and the offers resolution precedence.

use chrono::{TimeDelta, Utc};

use ambra_integration_tests::TestContext;
use ambra_integration_tests::fixtures::offer;
use ambra_storefront::models::content::{Section, SiteSettings};

#[tokio::test]
async fn test_first_load_provisions_the_default_document() {
    let ctx = TestContext::new();
    assert!(!ctx.docs.contains("content", "homepage"));

    let content = ctx.content().load().await.expect("load");
    assert!(!content.featured_brands.is_empty());

    // Read-through-create: the defaults were written in the same call.
    assert!(ctx.docs.contains("content", "homepage"));
}

#[tokio::test]
async fn test_section_update_leaves_siblings_untouched() {
    let ctx = TestContext::new();
    let content = ctx.content();
    let before = content.load().await.expect("load");

    content
        .update_section(Section::Settings(SiteSettings {
            dark_mode: true,
            default_language: ambra_core::Language::Ar,
        }))
        .await
        .expect("update");

    let after = content.load().await.expect("reload");
    assert!(after.settings.dark_mode);
    assert_eq!(after.hero, before.hero);
    assert_eq!(after.featured_brands, before.featured_brands);
    assert_eq!(after.marquee_brands, before.marquee_brands);
}

#[tokio::test]
async fn test_embedded_offers_take_precedence_over_collection() {
    let ctx = TestContext::new();
    let content = ctx.content();
    content.load().await.expect("provision defaults");

    // Both sources carry offers; only the homepage list may be served.
    ctx.docs.seed(
        "offers",
        "offer-collection-only",
        serde_json::to_value(offer("collection-only", "500", "400")).expect("offer doc"),
    );
    content
        .update_section(Section::Offers(vec![offer("embedded-eid", "420", "340")]))
        .await
        .expect("embed offer");

    let queries_before = ctx.docs.query_call_count();
    let active = content.active_offers().await.expect("resolve");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].slug, "embedded-eid");
    // The separate collection was never consulted.
    assert_eq!(ctx.docs.query_call_count(), queries_before);
}

#[tokio::test]
async fn test_collection_is_consulted_when_homepage_has_none() {
    let ctx = TestContext::new();
    let content = ctx.content();
    content.load().await.expect("provision defaults");

    ctx.docs.seed(
        "offers",
        "offer-ramadan-set",
        serde_json::to_value(offer("ramadan-set", "500", "400")).expect("offer doc"),
    );

    let active = content.active_offers().await.expect("resolve");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].slug, "ramadan-set");
}

#[tokio::test]
async fn test_expired_and_inactive_offers_are_filtered() {
    let ctx = TestContext::new();
    let content = ctx.content();
    content.load().await.expect("provision defaults");

    let mut expired = offer("expired", "500", "400");
    expired.ends_at = Some(Utc::now() - TimeDelta::days(1));
    let mut inactive = offer("inactive", "500", "400");
    inactive.active = false;
    let live = offer("live", "420", "340");

    content
        .update_section(Section::Offers(vec![expired, inactive, live]))
        .await
        .expect("embed offers");

    let active = content.active_offers().await.expect("resolve");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].slug, "live");
}

#[tokio::test]
async fn test_collection_outage_reverts_to_homepage_list() {
    let ctx = TestContext::new();
    let content = ctx.content();

    // Homepage exists with an empty offer list; loading it caches a copy.
    content.load().await.expect("provision defaults");

    // The collection would be consulted next, but the backend is down.
    ctx.docs.set_unavailable(true);
    let active = content.active_offers().await.expect("resolve degrades");

    // Reverts to the homepage-embedded list even though it is empty.
    assert!(active.is_empty());
}
