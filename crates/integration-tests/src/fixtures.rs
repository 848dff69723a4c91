//! Shared domain fixtures.

use chrono::{TimeDelta, Utc};
use serde_json::{Value, json};

use ambra_core::{Concentration, LocalizedText, OfferId, ProductId};
use ambra_storefront::models::offer::Offer;
use ambra_storefront::models::product::{FragranceNotes, Product};

/// A catalog product with sensible defaults.
#[must_use]
pub fn product(id: &str, price: &str) -> Product {
    let now = Utc::now();
    Product {
        id: ProductId::new(id),
        slug: id.to_owned(),
        name: LocalizedText::new(format!("Product {id}"), format!("منتج {id}")),
        description: LocalizedText::default(),
        brand: "Maison Noor".into(),
        category: "oriental".into(),
        price: price.parse().expect("fixture price"),
        size: "100ml".into(),
        concentration: Concentration::EauDeParfum,
        notes: FragranceNotes::default(),
        images: vec![format!("products/{id}/main.jpg")],
        bestseller: false,
        featured: false,
        in_stock: true,
        stock_quantity: 50,
        rating: 4.0,
        review_count: 10,
        created_at: now - TimeDelta::days(90),
        updated_at: now,
    }
}

/// The JSON document form of [`product`].
#[must_use]
pub fn product_doc(id: &str, price: &str) -> Value {
    serde_json::to_value(product(id, price)).expect("fixture serializes")
}

/// An active, unbounded offer.
#[must_use]
pub fn offer(slug: &str, old_price: &str, new_price: &str) -> Offer {
    Offer {
        id: OfferId::new(format!("offer-{slug}")),
        slug: slug.to_owned(),
        title: LocalizedText::new(format!("Offer {slug}"), format!("عرض {slug}")),
        subtitle: LocalizedText::default(),
        description: LocalizedText::default(),
        image: None,
        old_price: old_price.parse().expect("fixture price"),
        new_price: new_price.parse().expect("fixture price"),
        starts_at: None,
        ends_at: None,
        active: true,
    }
}

/// An admin authorization record document.
#[must_use]
pub fn admin_record_doc(email: &str, name: &str, role: &str, active: bool) -> Value {
    json!({ "email": email, "name": name, "role": role, "active": active })
}

/// A customer profile document.
#[must_use]
pub fn customer_profile_doc(email: &str, display_name: &str) -> Value {
    json!({
        "email": email,
        "display_name": display_name,
        "created_at": "2026-01-01T00:00:00Z",
    })
}
