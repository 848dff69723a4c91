//! Presentation directives and the language preference.
//!
//! The state layer never touches a live document object; it produces a
//! directive (locale, direction, font stack) that the UI layer applies.

use tracing::warn;

use ambra_core::Language;

use crate::local::{LocalStore, keys};

/// Text direction for the active language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    LeftToRight,
    RightToLeft,
}

impl TextDirection {
    /// The HTML `dir` attribute value.
    #[must_use]
    pub const fn attr(self) -> &'static str {
        match self {
            Self::LeftToRight => "ltr",
            Self::RightToLeft => "rtl",
        }
    }
}

/// What the UI layer needs to render for a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationDirective {
    /// BCP 47 locale tag.
    pub locale: &'static str,
    pub direction: TextDirection,
    /// CSS font-family stack.
    pub font_stack: &'static str,
}

/// Directive for the active language. Pure; safe to call anywhere.
#[must_use]
pub const fn directive(language: Language) -> PresentationDirective {
    match language {
        Language::En => PresentationDirective {
            locale: "en-US",
            direction: TextDirection::LeftToRight,
            font_stack: "'Cormorant Garamond', 'Inter', sans-serif",
        },
        Language::Ar => PresentationDirective {
            locale: "ar-AE",
            direction: TextDirection::RightToLeft,
            font_stack: "'Amiri', 'Cairo', sans-serif",
        },
    }
}

/// The persisted language preference, defaulting to English.
#[must_use]
pub fn active_language(local: &dyn LocalStore) -> Language {
    local
        .read(keys::LANGUAGE)
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or_default()
}

/// Persist the language preference.
pub fn set_active_language(local: &dyn LocalStore, language: Language) {
    if let Err(err) = local.write(keys::LANGUAGE, language.code()) {
        warn!(error = %err, "failed to persist language preference");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::MemoryLocalStore;

    #[test]
    fn test_language_preference_round_trip() {
        let local = MemoryLocalStore::default();
        assert_eq!(active_language(&local), Language::En);

        set_active_language(&local, Language::Ar);
        assert_eq!(active_language(&local), Language::Ar);
    }

    #[test]
    fn test_arabic_is_right_to_left() {
        let directive = directive(Language::Ar);
        assert_eq!(directive.direction, TextDirection::RightToLeft);
        assert_eq!(directive.direction.attr(), "rtl");
        assert_eq!(directive.locale, "ar-AE");
    }

    #[test]
    fn test_english_is_left_to_right() {
        let directive = directive(Language::En);
        assert_eq!(directive.direction.attr(), "ltr");
    }
}
