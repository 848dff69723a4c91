//! Homepage content: the editorially curated singleton document.

use serde::{Deserialize, Serialize};

use ambra_core::{Language, LocalizedText};

use super::offer::Offer;

/// Hero banner at the top of the homepage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HeroBanner {
    pub headline: LocalizedText,
    #[serde(default)]
    pub subheadline: LocalizedText,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub cta_label: LocalizedText,
    #[serde(default)]
    pub cta_href: String,
}

/// A featured-brand tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandTile {
    pub brand: String,
    #[serde(default)]
    pub tagline: LocalizedText,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub href: String,
}

/// A logo in the scrolling brand marquee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarqueeBrand {
    pub name: String,
    #[serde(default)]
    pub logo: String,
}

/// Site-wide display settings edited from the admin console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SiteSettings {
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default)]
    pub default_language: Language,
}

/// The singleton homepage document.
///
/// Lazily created with [`HomepageContent::bundled_default`] on first read
/// when no persisted document exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HomepageContent {
    #[serde(default)]
    pub hero: HeroBanner,
    #[serde(default)]
    pub featured_brands: Vec<BrandTile>,
    #[serde(default)]
    pub offers: Vec<Offer>,
    #[serde(default)]
    pub marquee_brands: Vec<MarqueeBrand>,
    #[serde(default)]
    pub settings: SiteSettings,
}

impl HomepageContent {
    /// The content shipped with the build, used until an editor saves a
    /// persisted document.
    #[must_use]
    pub fn bundled_default() -> Self {
        Self {
            hero: HeroBanner {
                headline: LocalizedText::new(
                    "The Art of Arabian Perfumery",
                    "فن العطور العربية",
                ),
                subheadline: LocalizedText::new(
                    "Hand-blended oud, amber and rose from the world's great maisons",
                    "عود وعنبر وورد ممزوج يدويا من أعرق دور العطور",
                ),
                image: "content/hero-default.jpg".into(),
                cta_label: LocalizedText::new("Explore the Collection", "اكتشف المجموعة"),
                cta_href: "/products".into(),
            },
            featured_brands: vec![
                BrandTile {
                    brand: "Maison Noor".into(),
                    tagline: LocalizedText::new("Modern oud compositions", "تراكيب عود عصرية"),
                    image: "content/brands/maison-noor.jpg".into(),
                    href: "/brands/maison-noor".into(),
                },
                BrandTile {
                    brand: "Dar Al Teeb".into(),
                    tagline: LocalizedText::new("Classic attars since 1952", "عطور كلاسيكية منذ ١٩٥٢"),
                    image: "content/brands/dar-al-teeb.jpg".into(),
                    href: "/brands/dar-al-teeb".into(),
                },
            ],
            offers: vec![],
            marquee_brands: vec![
                MarqueeBrand {
                    name: "Maison Noor".into(),
                    logo: "content/logos/maison-noor.svg".into(),
                },
                MarqueeBrand {
                    name: "Dar Al Teeb".into(),
                    logo: "content/logos/dar-al-teeb.svg".into(),
                },
                MarqueeBrand {
                    name: "Oudh Royale".into(),
                    logo: "content/logos/oudh-royale.svg".into(),
                },
            ],
            settings: SiteSettings::default(),
        }
    }
}

/// A partial update targeting exactly one top-level section.
///
/// Applying a section replaces that section wholesale and leaves every
/// sibling untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "section", content = "data", rename_all = "snake_case")]
pub enum Section {
    Hero(HeroBanner),
    FeaturedBrands(Vec<BrandTile>),
    Offers(Vec<Offer>),
    MarqueeBrands(Vec<MarqueeBrand>),
    Settings(SiteSettings),
}

impl Section {
    /// Name of the targeted section, for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Hero(_) => "hero",
            Self::FeaturedBrands(_) => "featured_brands",
            Self::Offers(_) => "offers",
            Self::MarqueeBrands(_) => "marquee_brands",
            Self::Settings(_) => "settings",
        }
    }

    /// Replace the matching section of `content`.
    pub fn apply_to(self, content: &mut HomepageContent) {
        match self {
            Self::Hero(hero) => content.hero = hero,
            Self::FeaturedBrands(brands) => content.featured_brands = brands,
            Self::Offers(offers) => content.offers = offers,
            Self::MarqueeBrands(brands) => content.marquee_brands = brands,
            Self::Settings(settings) => content.settings = settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_default_has_marquee_and_brands() {
        let content = HomepageContent::bundled_default();
        assert!(!content.featured_brands.is_empty());
        assert!(!content.marquee_brands.is_empty());
        assert!(content.offers.is_empty());
    }

    #[test]
    fn test_section_apply_leaves_siblings_untouched() {
        let mut content = HomepageContent::bundled_default();
        let brands_before = content.featured_brands.clone();

        Section::Settings(SiteSettings {
            dark_mode: true,
            default_language: Language::Ar,
        })
        .apply_to(&mut content);

        assert!(content.settings.dark_mode);
        assert_eq!(content.settings.default_language, Language::Ar);
        assert_eq!(content.featured_brands, brands_before);
        assert_eq!(content.hero, HomepageContent::bundled_default().hero);
    }

    #[test]
    fn test_empty_document_deserializes_to_defaults() {
        let content: HomepageContent = serde_json::from_str("{}").expect("empty doc");
        assert_eq!(content.hero, HeroBanner::default());
        assert!(content.offers.is_empty());
    }
}
