//! Bilingual text handling.
//!
//! Every customer-visible string on the site is stored in both English and
//! Arabic. [`LocalizedText`] keeps the two together and [`LocalizedText::resolve`]
//! picks the right one for the active [`Language`], falling back to the other
//! language when the active one is blank.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when validating a [`LocalizedText`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum TextError {
    /// Both language variants are empty.
    #[error("localized text requires at least one language")]
    Empty,
}

/// Display language for the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// English (left-to-right).
    #[default]
    En,
    /// Arabic (right-to-left).
    Ar,
}

impl Language {
    /// ISO 639-1 language code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "ar" => Ok(Self::Ar),
            _ => Err(format!("unsupported language: {s}")),
        }
    }
}

/// A customer-visible string stored in both supported languages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LocalizedText {
    /// English variant.
    #[serde(default)]
    pub en: String,
    /// Arabic variant.
    #[serde(default)]
    pub ar: String,
}

impl LocalizedText {
    /// Create a new bilingual string.
    pub fn new(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ar: ar.into(),
        }
    }

    /// Resolve to the string for the active language.
    ///
    /// Falls back to the other language when the active variant is blank,
    /// so a half-translated record still renders something.
    #[must_use]
    pub fn resolve(&self, language: Language) -> &str {
        let (active, fallback) = match language {
            Language::En => (&self.en, &self.ar),
            Language::Ar => (&self.ar, &self.en),
        };
        if active.trim().is_empty() {
            fallback
        } else {
            active
        }
    }

    /// Validate that at least one language variant is present.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] when both variants are blank.
    pub fn validate(&self) -> Result<(), TextError> {
        if self.en.trim().is_empty() && self.ar.trim().is_empty() {
            return Err(TextError::Empty);
        }
        Ok(())
    }

    /// Case-insensitive substring match against either language variant.
    ///
    /// `needle` must already be lowercased by the caller.
    #[must_use]
    pub fn contains_lower(&self, needle: &str) -> bool {
        self.en.to_lowercase().contains(needle) || self.ar.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_active_language() {
        let text = LocalizedText::new("Amber Oud", "عود العنبر");
        assert_eq!(text.resolve(Language::En), "Amber Oud");
        assert_eq!(text.resolve(Language::Ar), "عود العنبر");
    }

    #[test]
    fn test_resolve_falls_back_when_blank() {
        let text = LocalizedText::new("Amber Oud", "");
        assert_eq!(text.resolve(Language::Ar), "Amber Oud");

        let text = LocalizedText::new("  ", "عود");
        assert_eq!(text.resolve(Language::En), "عود");
    }

    #[test]
    fn test_validate_rejects_fully_blank() {
        assert!(LocalizedText::new("", " ").validate().is_err());
        assert!(LocalizedText::new("x", "").validate().is_ok());
    }

    #[test]
    fn test_contains_lower_matches_both_languages() {
        let text = LocalizedText::new("Midnight Rose", "وردة منتصف الليل");
        assert!(text.contains_lower("rose"));
        assert!(text.contains_lower("وردة"));
        assert!(!text.contains_lower("vetiver"));
    }

    #[test]
    fn test_language_from_str() {
        assert_eq!("ar".parse::<Language>(), Ok(Language::Ar));
        assert!("fr".parse::<Language>().is_err());
    }
}
