//! Promotional offers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ambra_core::{LocalizedText, OfferId};

/// A promotional offer, unique by slug.
///
/// `new_price` is not required to undercut `old_price`; markup pricing is
/// allowed and the admin surface does not reject it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub slug: String,
    pub title: LocalizedText,
    #[serde(default)]
    pub subtitle: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub image: Option<String>,
    pub old_price: Decimal,
    pub new_price: Decimal,
    /// Start of the validity window, if bounded.
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    /// End of the validity window, if bounded.
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    pub active: bool,
}

impl Offer {
    /// Whether the offer should be displayed at `now`: flagged active and
    /// inside its validity window (an absent bound is unbounded).
    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.active
            && self.starts_at.is_none_or(|start| start <= now)
            && self.ends_at.is_none_or(|end| now <= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn offer(active: bool) -> Offer {
        Offer {
            id: OfferId::new("offer-1"),
            slug: "eid-amber-set".into(),
            title: LocalizedText::new("Eid Amber Set", "طقم العنبر للعيد"),
            subtitle: LocalizedText::default(),
            description: LocalizedText::default(),
            image: None,
            old_price: Decimal::from(420),
            new_price: Decimal::from(340),
            starts_at: None,
            ends_at: None,
            active,
        }
    }

    #[test]
    fn test_inactive_offer_is_never_live() {
        assert!(!offer(false).is_live(Utc::now()));
    }

    #[test]
    fn test_unbounded_active_offer_is_live() {
        assert!(offer(true).is_live(Utc::now()));
    }

    #[test]
    fn test_validity_window_bounds() {
        let now = Utc::now();
        let mut o = offer(true);
        o.starts_at = Some(now - TimeDelta::days(2));
        o.ends_at = Some(now + TimeDelta::days(2));
        assert!(o.is_live(now));

        o.ends_at = Some(now - TimeDelta::days(1));
        assert!(!o.is_live(now));

        o.starts_at = Some(now + TimeDelta::days(1));
        o.ends_at = None;
        assert!(!o.is_live(now));
    }

    #[test]
    fn test_markup_offer_allowed() {
        let mut o = offer(true);
        o.new_price = Decimal::from(500);
        // No validation rejects new_price above old_price.
        assert!(o.new_price > o.old_price);
        assert!(o.is_live(Utc::now()));
    }
}
