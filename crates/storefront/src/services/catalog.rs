//! Product catalog cache.
//!
//! Holds the in-memory product list behind a remote fetch with a durable
//! snapshot fallback. Filtering, searching and related-product lookup are
//! pure functions over the in-memory list, recomputed on every call.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use ambra_core::{Concentration, Language};

use crate::error::{Result, StoreError};
use crate::local::{LocalStore, keys};
use crate::models::product::Product;
use crate::ports::documents::{Direction, Documents, Query};
use crate::ports::ux::{Notifier, Severity};

/// Products created within this window count as new arrivals.
const NEW_ARRIVAL_WINDOW_DAYS: i64 = 30;

const PRODUCTS_COLLECTION: &str = "products";

/// Where the in-memory list last came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Fetched live from the backend.
    Live,
    /// Served from the durable snapshot after a failed fetch.
    Cache,
}

/// Sort order for filtered listings. Ties keep catalog order (the sort is
/// stable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    NewestFirst,
    PriceAsc,
    PriceDesc,
    RatingDesc,
    BestsellerFirst,
    NameAsc,
    NameDesc,
}

/// Filter predicates for a catalog listing. Unset fields do not filter.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub category: Option<String>,
    pub brand: Option<String>,
    /// Inclusive lower price bound.
    pub price_min: Option<Decimal>,
    /// Inclusive upper price bound.
    pub price_max: Option<Decimal>,
    pub concentration: Option<Concentration>,
    pub min_rating: Option<f32>,
    pub bestsellers_only: bool,
    /// Created within the last 30 days.
    pub new_arrivals_only: bool,
    pub sort: SortKey,
    /// Language whose name variant drives the name sorts.
    pub language: Language,
}

/// The durable catalog snapshot.
#[derive(Serialize, Deserialize)]
struct CatalogSnapshot {
    fetched_at: DateTime<Utc>,
    products: Vec<Product>,
}

struct CatalogState {
    products: Vec<Product>,
    source: Option<DataSource>,
}

/// In-memory catalog with remote refresh and snapshot fallback.
pub struct CatalogService {
    docs: Arc<dyn Documents>,
    local: Arc<dyn LocalStore>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<CatalogState>,
}

impl CatalogService {
    /// Create the service with an empty list; call [`Self::refresh`] to
    /// populate it.
    pub fn new(
        docs: Arc<dyn Documents>,
        local: Arc<dyn LocalStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            docs,
            local,
            notifier,
            state: Mutex::new(CatalogState {
                products: Vec::new(),
                source: None,
            }),
        }
    }

    /// Replace the in-memory list from the backend.
    ///
    /// On success the list is also written to the durable snapshot. On
    /// failure the most recent snapshot is served instead (flagged as
    /// [`DataSource::Cache`]); with no snapshot the list is left empty.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transient`] when the fetch fails and no
    /// snapshot exists.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<DataSource> {
        let query = Query::all().order("created_at", Direction::Desc);
        match self.docs.query(PRODUCTS_COLLECTION, query).await {
            Ok(documents) => {
                let products: Vec<Product> = documents
                    .into_iter()
                    .filter_map(|document| match serde_json::from_value(document) {
                        Ok(product) => Some(product),
                        Err(err) => {
                            warn!(error = %err, "skipping malformed product document");
                            None
                        }
                    })
                    .collect();

                self.write_snapshot(&products);
                let mut state = self.lock();
                state.products = products;
                state.source = Some(DataSource::Live);
                Ok(DataSource::Live)
            }
            Err(err) => {
                warn!(error = %err, "catalog fetch failed");
                if let Some(snapshot) = self.read_snapshot() {
                    self.notifier.notify(
                        Severity::Warning,
                        "Showing previously loaded products; some may be out of date",
                    );
                    let mut state = self.lock();
                    state.products = snapshot.products;
                    state.source = Some(DataSource::Cache);
                    return Ok(DataSource::Cache);
                }
                self.notifier
                    .notify(Severity::Error, "Could not load products");
                Err(StoreError::Transient(err.to_string()))
            }
        }
    }

    /// The current in-memory list, in catalog order.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.lock().products.clone()
    }

    /// Where the current list came from, if it was ever loaded.
    #[must_use]
    pub fn source(&self) -> Option<DataSource> {
        self.lock().source
    }

    /// Look up a product by slug.
    #[must_use]
    pub fn by_slug(&self, slug: &str) -> Option<Product> {
        self.lock()
            .products
            .iter()
            .find(|product| product.slug == slug)
            .cloned()
    }

    /// Apply filter predicates and a sort to the in-memory list.
    #[must_use]
    pub fn filter(&self, options: &FilterOptions) -> Vec<Product> {
        filter_products(&self.lock().products, options, Utc::now())
    }

    /// Case-insensitive substring search across names, descriptions,
    /// brand, concentration and notes.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<Product> {
        search_products(&self.lock().products, term)
    }

    /// Up to `limit` other products sharing a category or brand.
    #[must_use]
    pub fn related_to(&self, product: &Product, limit: usize) -> Vec<Product> {
        related_products(&self.lock().products, product, limit)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_snapshot(&self, products: &[Product]) {
        let snapshot = CatalogSnapshot {
            fetched_at: Utc::now(),
            products: products.to_vec(),
        };
        match serde_json::to_string(&snapshot) {
            Ok(raw) => {
                if let Err(err) = self.local.write(keys::CACHED_CATALOG, &raw) {
                    warn!(error = %err, "failed to write catalog snapshot");
                }
            }
            Err(err) => warn!(error = %err, "failed to serialize catalog snapshot"),
        }
    }

    fn read_snapshot(&self) -> Option<CatalogSnapshot> {
        let raw = self.local.read(keys::CACHED_CATALOG)?;
        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                warn!(error = %err, "discarding unreadable catalog snapshot");
                None
            }
        }
    }
}

/// Apply `options` to `products`, preserving catalog order for ties.
#[must_use]
pub fn filter_products(
    products: &[Product],
    options: &FilterOptions,
    now: DateTime<Utc>,
) -> Vec<Product> {
    let new_arrival_cutoff = now - TimeDelta::days(NEW_ARRIVAL_WINDOW_DAYS);

    let mut matched: Vec<Product> = products
        .iter()
        .filter(|product| {
            options
                .category
                .as_ref()
                .is_none_or(|category| product.category == *category)
                && options
                    .brand
                    .as_ref()
                    .is_none_or(|brand| product.brand == *brand)
                && options.price_min.is_none_or(|min| product.price >= min)
                && options.price_max.is_none_or(|max| product.price <= max)
                && options
                    .concentration
                    .is_none_or(|concentration| product.concentration == concentration)
                && options
                    .min_rating
                    .is_none_or(|min| product.rating >= min)
                && (!options.bestsellers_only || product.bestseller)
                && (!options.new_arrivals_only || product.created_at >= new_arrival_cutoff)
        })
        .cloned()
        .collect();

    // Vec::sort_by is stable, so equal keys keep input order.
    match options.sort {
        SortKey::NewestFirst => matched.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::PriceAsc => matched.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceDesc => matched.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::RatingDesc => matched.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortKey::BestsellerFirst => matched.sort_by_key(|product| !product.bestseller),
        SortKey::NameAsc => sort_by_name(&mut matched, options.language, false),
        SortKey::NameDesc => sort_by_name(&mut matched, options.language, true),
    }

    matched
}

fn sort_by_name(products: &mut [Product], language: Language, reverse: bool) {
    products.sort_by(|a, b| {
        let ordering = a.name.resolve(language).cmp(b.name.resolve(language));
        if reverse { ordering.reverse() } else { ordering }
    });
}

/// Case-insensitive OR-match over bilingual name and description, brand,
/// concentration label and every note layer. An empty or whitespace-only
/// term matches nothing.
#[must_use]
pub fn search_products(products: &[Product], term: &str) -> Vec<Product> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    products
        .iter()
        .filter(|product| {
            product.name.contains_lower(&needle)
                || product.description.contains_lower(&needle)
                || product.brand.to_lowercase().contains(&needle)
                || product
                    .concentration
                    .label()
                    .to_lowercase()
                    .contains(&needle)
                || product.notes.contains_lower(&needle)
        })
        .cloned()
        .collect()
}

/// Up to `limit` products sharing `product`'s category or brand, excluding
/// the product itself, in catalog order.
#[must_use]
pub fn related_products(products: &[Product], product: &Product, limit: usize) -> Vec<Product> {
    products
        .iter()
        .filter(|candidate| {
            candidate.id != product.id
                && (candidate.category == product.category || candidate.brand == product.brand)
        })
        .take(limit)
        .cloned()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::testing::product;
    use ambra_core::LocalizedText;

    fn catalog() -> Vec<Product> {
        let mut amber = product("amber-oud", "350");
        amber.category = "oriental".into();
        amber.bestseller = true;
        amber.rating = 4.8;

        let mut rose = product("midnight-rose", "180");
        rose.category = "floral".into();
        rose.brand = "Dar Al Teeb".into();
        rose.rating = 4.2;
        rose.notes.heart = vec!["Damask Rose".into()];

        let mut vetiver = product("vetiver-sport", "95");
        vetiver.category = "fresh".into();
        vetiver.brand = "Dar Al Teeb".into();
        vetiver.rating = 3.9;
        vetiver.created_at = Utc::now() - TimeDelta::days(5);

        vec![amber, rose, vetiver]
    }

    #[test]
    fn test_filter_by_category_and_price_range() {
        let products = catalog();
        let options = FilterOptions {
            category: Some("floral".into()),
            ..FilterOptions::default()
        };
        let result = filter_products(&products, &options, Utc::now());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].slug, "midnight-rose");

        let options = FilterOptions {
            price_min: Some(Decimal::from(95)),
            price_max: Some(Decimal::from(180)),
            sort: SortKey::PriceAsc,
            ..FilterOptions::default()
        };
        let result = filter_products(&products, &options, Utc::now());
        // Inclusive bounds keep both endpoints.
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].slug, "vetiver-sport");
    }

    #[test]
    fn test_filter_new_arrivals_window() {
        let products = catalog();
        let options = FilterOptions {
            new_arrivals_only: true,
            ..FilterOptions::default()
        };
        let result = filter_products(&products, &options, Utc::now());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].slug, "vetiver-sport");
    }

    #[test]
    fn test_filter_min_rating_and_bestsellers() {
        let products = catalog();
        let options = FilterOptions {
            min_rating: Some(4.0),
            ..FilterOptions::default()
        };
        assert_eq!(filter_products(&products, &options, Utc::now()).len(), 2);

        let options = FilterOptions {
            bestsellers_only: true,
            ..FilterOptions::default()
        };
        let result = filter_products(&products, &options, Utc::now());
        assert_eq!(result.len(), 1);
        assert!(result[0].bestseller);
    }

    #[test]
    fn test_sort_newest_first_is_default() {
        let products = catalog();
        let result = filter_products(&products, &FilterOptions::default(), Utc::now());
        assert_eq!(result[0].slug, "vetiver-sport");
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let mut products = catalog();
        // Force equal prices; ties must keep catalog order.
        for product in &mut products {
            product.price = Decimal::from(100);
        }
        let options = FilterOptions {
            sort: SortKey::PriceAsc,
            ..FilterOptions::default()
        };
        let result = filter_products(&products, &options, Utc::now());
        let slugs: Vec<&str> = result.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["amber-oud", "midnight-rose", "vetiver-sport"]);
    }

    #[test]
    fn test_sort_by_name_uses_active_language() {
        let mut products = catalog();
        products[0].name = LocalizedText::new("Zafran", "زعفران");
        products[1].name = LocalizedText::new("Amber", "عنبر");
        products[2].name = LocalizedText::new("Musk", "مسك");

        let options = FilterOptions {
            sort: SortKey::NameAsc,
            ..FilterOptions::default()
        };
        let result = filter_products(&products, &options, Utc::now());
        let names: Vec<&str> = result.iter().map(|p| p.name.en.as_str()).collect();
        assert_eq!(names, ["Amber", "Musk", "Zafran"]);
    }

    #[test]
    fn test_search_blank_term_matches_nothing() {
        let products = catalog();
        assert!(search_products(&products, "").is_empty());
        assert!(search_products(&products, "   ").is_empty());
    }

    #[test]
    fn test_search_matches_notes_and_brand() {
        let products = catalog();
        let by_note = search_products(&products, "damask");
        assert_eq!(by_note.len(), 1);
        assert_eq!(by_note[0].slug, "midnight-rose");

        let by_brand = search_products(&products, "dar al");
        assert_eq!(by_brand.len(), 2);
    }

    #[test]
    fn test_search_matches_arabic_name() {
        let mut products = catalog();
        products[0].name = LocalizedText::new("Amber Oud", "عود العنبر");
        let result = search_products(&products, "العنبر");
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_related_shares_category_or_brand() {
        let products = catalog();
        let rose = products[1].clone();
        let related = related_products(&products, &rose, 5);
        // vetiver shares the brand; amber shares nothing with rose.
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].slug, "vetiver-sport");
    }

    #[test]
    fn test_related_respects_limit_and_excludes_self() {
        let products = catalog();
        let amber = products[0].clone();
        let mut sibling = product("oud-royale", "400");
        sibling.category = "oriental".into();
        let mut extended = products;
        extended.push(sibling);

        let related = related_products(&extended, &amber, 1);
        assert_eq!(related.len(), 1);
        assert_ne!(related[0].id, amber.id);
    }
}
