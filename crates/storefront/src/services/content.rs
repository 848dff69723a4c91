//! Homepage and offers content store.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::error::{Result, StoreError};
use crate::models::content::{HomepageContent, Section};
use crate::models::offer::Offer;
use crate::ports::documents::{DocumentError, Documents, Query};
use crate::ports::ux::{Notifier, Severity};

const CONTENT_COLLECTION: &str = "content";
const HOMEPAGE_DOC: &str = "homepage";
const OFFERS_COLLECTION: &str = "offers";

/// Owns the singleton homepage document and active-offer resolution.
///
/// The homepage document is the editorially curated source of truth:
/// its embedded offer list takes precedence over the separate offers
/// collection, which is consulted only when the embedded list is empty.
pub struct ContentService {
    docs: Arc<dyn Documents>,
    notifier: Arc<dyn Notifier>,
    /// Last successfully loaded document, kept for offline fallback.
    cached: Mutex<Option<HomepageContent>>,
}

impl ContentService {
    /// Create the service; nothing is loaded until [`Self::load`].
    pub fn new(docs: Arc<dyn Documents>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            docs,
            notifier,
            cached: Mutex::new(None),
        }
    }

    /// Read the homepage document.
    ///
    /// Read-through-create: a missing document is written from the
    /// bundled defaults and returned in the same call. An unreachable
    /// backend degrades to the last loaded copy, else the bundled
    /// defaults.
    ///
    /// # Errors
    ///
    /// Infallible today; kept fallible for parity with the write path.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<HomepageContent> {
        match self.docs.get(CONTENT_COLLECTION, HOMEPAGE_DOC).await {
            Ok(raw) => match serde_json::from_value::<HomepageContent>(raw) {
                Ok(content) => {
                    *self.lock_cache() = Some(content.clone());
                    Ok(content)
                }
                Err(err) => {
                    warn!(error = %err, "malformed homepage document; using defaults");
                    Ok(self.fallback())
                }
            },
            Err(DocumentError::NotFound { .. }) => {
                let defaults = HomepageContent::bundled_default();
                info!("homepage document missing; provisioning defaults");
                if let Err(err) = self.write_document(&defaults).await {
                    warn!(error = %err, "failed to provision homepage defaults");
                }
                *self.lock_cache() = Some(defaults.clone());
                Ok(defaults)
            }
            Err(err) => {
                warn!(error = %err, "homepage fetch failed; serving fallback");
                self.notifier.notify(
                    Severity::Warning,
                    "Showing default homepage content; some sections may be out of date",
                );
                Ok(self.fallback())
            }
        }
    }

    /// Replace exactly one top-level section, leaving siblings untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transient`] when the write fails; the cached
    /// copy is left unchanged so the edit can be retried.
    #[instrument(skip(self, section), fields(section = section.name()))]
    pub async fn update_section(&self, section: Section) -> Result<()> {
        let mut content = self.load().await?;
        section.apply_to(&mut content);

        self.write_document(&content).await.map_err(|err| {
            self.notifier
                .notify(Severity::Error, "Could not save the section");
            StoreError::Transient(err.to_string())
        })?;

        *self.lock_cache() = Some(content);
        self.notifier.notify(Severity::Success, "Section saved");
        Ok(())
    }

    /// The offers to display right now.
    ///
    /// Homepage-embedded offers win; the offers collection is consulted
    /// only when the homepage carries none, and a failed collection fetch
    /// reverts to the homepage list even when that list is empty.
    ///
    /// # Errors
    ///
    /// Infallible today; the degraded paths resolve to the embedded list.
    #[instrument(skip(self))]
    pub async fn active_offers(&self) -> Result<Vec<Offer>> {
        let content = self.load().await?;
        let now = Utc::now();

        if !content.offers.is_empty() {
            return Ok(content
                .offers
                .into_iter()
                .filter(|offer| offer.is_live(now))
                .collect());
        }

        match self.docs.query(OFFERS_COLLECTION, Query::all()).await {
            Ok(documents) => Ok(documents
                .into_iter()
                .filter_map(|document| match serde_json::from_value::<Offer>(document) {
                    Ok(offer) => Some(offer),
                    Err(err) => {
                        warn!(error = %err, "skipping malformed offer document");
                        None
                    }
                })
                .filter(|offer| offer.is_live(now))
                .collect()),
            Err(err) => {
                warn!(error = %err, "offers fetch failed; reverting to homepage list");
                Ok(content
                    .offers
                    .into_iter()
                    .filter(|offer| offer.is_live(now))
                    .collect())
            }
        }
    }

    fn fallback(&self) -> HomepageContent {
        self.lock_cache()
            .clone()
            .unwrap_or_else(HomepageContent::bundled_default)
    }

    async fn write_document(
        &self,
        content: &HomepageContent,
    ) -> std::result::Result<(), DocumentError> {
        let value = serde_json::to_value(content).map_err(|err| DocumentError::Malformed {
            id: HOMEPAGE_DOC.to_owned(),
            reason: err.to_string(),
        })?;
        self.docs.put(CONTENT_COLLECTION, HOMEPAGE_DOC, value).await
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, Option<HomepageContent>> {
        self.cached
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
