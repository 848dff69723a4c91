//! Homepage section and offer editing.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use ambra_core::{LocalizedText, OfferId};
use ambra_storefront::error::{Result, StoreError};
use ambra_storefront::models::content::{HomepageContent, Section};
use ambra_storefront::models::offer::Offer;
use ambra_storefront::ports::documents::{DocumentError, Documents, Query};

const CONTENT_COLLECTION: &str = "content";
const HOMEPAGE_DOC: &str = "homepage";
const OFFERS_COLLECTION: &str = "offers";

/// Editor input for a new or updated offer.
///
/// `new_price` may exceed `old_price`; markup pricing is a supported
/// capability, not validated away.
#[derive(Debug, Clone)]
pub struct OfferDraft {
    pub slug: String,
    pub title: LocalizedText,
    pub subtitle: LocalizedText,
    pub description: LocalizedText,
    pub image: Option<String>,
    pub old_price: Decimal,
    pub new_price: Decimal,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub active: bool,
}

/// Marketing-content editing for the admin console.
pub struct ContentAdmin {
    docs: Arc<dyn Documents>,
}

impl ContentAdmin {
    /// Create the service.
    pub fn new(docs: Arc<dyn Documents>) -> Self {
        Self { docs }
    }

    /// Replace one homepage section, leaving siblings untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transient`] when the backend is unreachable.
    #[instrument(skip(self, section), fields(section = section.name()))]
    pub async fn edit_section(&self, section: Section) -> Result<()> {
        let mut content = match self.docs.get(CONTENT_COLLECTION, HOMEPAGE_DOC).await {
            Ok(raw) => serde_json::from_value(raw).unwrap_or_else(|err| {
                warn!(error = %err, "malformed homepage document; rebuilding from defaults");
                HomepageContent::bundled_default()
            }),
            Err(DocumentError::NotFound { .. }) => HomepageContent::bundled_default(),
            Err(err) => return Err(err.into()),
        };

        section.apply_to(&mut content);
        let value =
            serde_json::to_value(&content).map_err(|err| StoreError::Validation(err.to_string()))?;
        self.docs.put(CONTENT_COLLECTION, HOMEPAGE_DOC, value).await?;
        info!("homepage section saved");
        Ok(())
    }

    /// Create an offer, minting its id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for a malformed draft or a slug
    /// already in use, [`StoreError::Transient`] when the backend is
    /// unreachable.
    #[instrument(skip(self, draft), fields(slug = %draft.slug))]
    pub async fn create_offer(&self, draft: OfferDraft) -> Result<Offer> {
        validate_offer_draft(&draft)?;
        if self.offer_slug_in_use(&draft.slug, None).await? {
            return Err(StoreError::Validation(format!(
                "offer slug already in use: {}",
                draft.slug
            )));
        }

        let offer = Offer {
            id: OfferId::new(Uuid::new_v4().to_string()),
            slug: draft.slug,
            title: draft.title,
            subtitle: draft.subtitle,
            description: draft.description,
            image: draft.image,
            old_price: draft.old_price,
            new_price: draft.new_price,
            starts_at: draft.starts_at,
            ends_at: draft.ends_at,
            active: draft.active,
        };

        self.write_offer(&offer).await?;
        info!(id = %offer.id, "offer created");
        Ok(offer)
    }

    /// Update an existing offer in place.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id,
    /// [`StoreError::Validation`] for a malformed draft or a slug held by
    /// a different offer.
    #[instrument(skip(self, draft), fields(id = %id))]
    pub async fn update_offer(&self, id: &OfferId, draft: OfferDraft) -> Result<Offer> {
        validate_offer_draft(&draft)?;
        // Confirm existence before the uniqueness scan.
        self.docs.get(OFFERS_COLLECTION, id.as_str()).await?;
        if self.offer_slug_in_use(&draft.slug, Some(id)).await? {
            return Err(StoreError::Validation(format!(
                "offer slug already in use: {}",
                draft.slug
            )));
        }

        let offer = Offer {
            id: id.clone(),
            slug: draft.slug,
            title: draft.title,
            subtitle: draft.subtitle,
            description: draft.description,
            image: draft.image,
            old_price: draft.old_price,
            new_price: draft.new_price,
            starts_at: draft.starts_at,
            ends_at: draft.ends_at,
            active: draft.active,
        };

        self.write_offer(&offer).await?;
        info!("offer updated");
        Ok(offer)
    }

    /// Delete an offer. Deleting an unknown id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transient`] when the backend is unreachable.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_offer(&self, id: &OfferId) -> Result<()> {
        self.docs.delete(OFFERS_COLLECTION, id.as_str()).await?;
        info!("offer deleted");
        Ok(())
    }

    /// Every offer in the collection, newest slug order left to the
    /// backend.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transient`] when the backend is unreachable.
    pub async fn list_offers(&self) -> Result<Vec<Offer>> {
        let documents = self.docs.query(OFFERS_COLLECTION, Query::all()).await?;
        Ok(documents
            .into_iter()
            .filter_map(|document| match serde_json::from_value(document) {
                Ok(offer) => Some(offer),
                Err(err) => {
                    warn!(error = %err, "skipping malformed offer document");
                    None
                }
            })
            .collect())
    }

    async fn offer_slug_in_use(&self, slug: &str, exclude: Option<&OfferId>) -> Result<bool> {
        let matches = self
            .docs
            .query(OFFERS_COLLECTION, Query::all().where_eq("slug", json!(slug)))
            .await?;
        Ok(matches.into_iter().any(|document| {
            serde_json::from_value::<Offer>(document)
                .map(|offer| exclude != Some(&offer.id))
                .unwrap_or(false)
        }))
    }

    async fn write_offer(&self, offer: &Offer) -> Result<()> {
        let value =
            serde_json::to_value(offer).map_err(|err| StoreError::Validation(err.to_string()))?;
        self.docs
            .put(OFFERS_COLLECTION, offer.id.as_str(), value)
            .await?;
        Ok(())
    }
}

fn validate_offer_draft(draft: &OfferDraft) -> Result<()> {
    draft
        .title
        .validate()
        .map_err(|err| StoreError::Validation(format!("title: {err}")))?;
    validate_slug(&draft.slug)?;
    if draft.old_price < Decimal::ZERO || draft.new_price < Decimal::ZERO {
        return Err(StoreError::Validation("prices cannot be negative".into()));
    }
    if let (Some(starts_at), Some(ends_at)) = (draft.starts_at, draft.ends_at)
        && starts_at > ends_at
    {
        return Err(StoreError::Validation(
            "validity window ends before it starts".into(),
        ));
    }
    Ok(())
}

/// Slugs are lowercase ASCII, digits and hyphens.
pub(crate) fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() {
        return Err(StoreError::Validation("slug cannot be empty".into()));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(StoreError::Validation(format!(
            "slug may only contain lowercase letters, digits and hyphens: {slug}"
        )));
    }
    Ok(())
}
