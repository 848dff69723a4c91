//! Integration test support for Ambra.
//!
//! Every external collaborator has an in-memory fake here, plus a
//! [`TestContext`] that wires the storefront services together the way a
//! real session would, with the fakes behind every port.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ambra-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod fakes;
pub mod fixtures;

use std::sync::Arc;

use ambra_core::CurrencyCode;
use ambra_storefront::services::{
    CartService, CatalogService, ContentService, CurrencyService, SessionService, WishlistService,
};

use fakes::{
    AutoConfirmer, FakeAuthBackend, InMemoryDocuments, MemoryLocalStore, RecordingNotifier,
    RecordingStorage, StaticRateSource,
};

/// A full set of collaborator fakes plus constructors for every service,
/// mirroring the production wiring at session start.
pub struct TestContext {
    pub docs: Arc<InMemoryDocuments>,
    pub auth: Arc<FakeAuthBackend>,
    pub local: Arc<MemoryLocalStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub confirmer: Arc<AutoConfirmer>,
    pub rates: Arc<StaticRateSource>,
    pub storage: Arc<RecordingStorage>,
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        Self {
            docs: Arc::new(InMemoryDocuments::default()),
            auth: Arc::new(FakeAuthBackend::default()),
            local: Arc::new(MemoryLocalStore::default()),
            notifier: Arc::new(RecordingNotifier::default()),
            confirmer: Arc::new(AutoConfirmer::new(true)),
            rates: Arc::new(StaticRateSource::default()),
            storage: Arc::new(RecordingStorage::default()),
        }
    }

    #[must_use]
    pub fn cart(&self) -> CartService {
        CartService::new(
            self.local.clone(),
            self.confirmer.clone(),
            self.notifier.clone(),
        )
    }

    #[must_use]
    pub fn wishlist(&self) -> WishlistService {
        WishlistService::new(
            self.local.clone(),
            self.confirmer.clone(),
            self.notifier.clone(),
        )
    }

    #[must_use]
    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(
            self.docs.clone(),
            self.local.clone(),
            self.notifier.clone(),
        )
    }

    #[must_use]
    pub fn currency(&self, base: &str) -> CurrencyService {
        CurrencyService::new(
            self.rates.clone(),
            self.local.clone(),
            self.notifier.clone(),
            CurrencyCode::parse(base).expect("test base currency"),
        )
    }

    #[must_use]
    pub fn sessions(&self) -> SessionService {
        SessionService::new(
            self.auth.clone(),
            self.docs.clone(),
            self.local.clone(),
            self.notifier.clone(),
        )
    }

    #[must_use]
    pub fn content(&self) -> ContentService {
        ContentService::new(self.docs.clone(), self.notifier.clone())
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
