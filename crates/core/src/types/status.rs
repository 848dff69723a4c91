//! Domain enums shared across the storefront and admin console.

use serde::{Deserialize, Serialize};

/// Fragrance concentration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Concentration {
    ExtraitDeParfum,
    Parfum,
    #[default]
    EauDeParfum,
    EauDeToilette,
    EauDeCologne,
}

impl Concentration {
    /// Customer-facing label, as printed on the bottle.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ExtraitDeParfum => "Extrait de Parfum",
            Self::Parfum => "Parfum",
            Self::EauDeParfum => "Eau de Parfum",
            Self::EauDeToilette => "Eau de Toilette",
            Self::EauDeCologne => "Eau de Cologne",
        }
    }
}

impl std::fmt::Display for Concentration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Derived availability of a wishlisted product.
///
/// Recomputed from catalog data; never persisted as a source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    #[default]
    InStock,
    LowStock,
    OutOfStock,
}

/// The three fragrance note layers, top to base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteLayer {
    Top,
    Heart,
    Base,
}

/// Admin role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Full access to all admin features including team management.
    SuperAdmin,
    /// Full access to store management features.
    Admin,
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuperAdmin => write!(f, "super_admin"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid admin role: {s}")),
        }
    }
}

/// Visibility of a shared wishlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WishlistPrivacy {
    /// Only the owner can see the list.
    #[default]
    Private,
    /// Anyone holding the share link can see the list.
    Shared,
    /// The list is publicly discoverable.
    Public,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concentration_labels() {
        assert_eq!(Concentration::EauDeParfum.label(), "Eau de Parfum");
        assert_eq!(Concentration::ExtraitDeParfum.label(), "Extrait de Parfum");
    }

    #[test]
    fn test_admin_role_roundtrip() {
        assert_eq!("super_admin".parse::<AdminRole>(), Ok(AdminRole::SuperAdmin));
        assert_eq!(AdminRole::Admin.to_string(), "admin");
        assert!("viewer".parse::<AdminRole>().is_err());
    }

    #[test]
    fn test_stock_status_serde_names() {
        let json = serde_json::to_string(&StockStatus::OutOfStock).unwrap();
        assert_eq!(json, "\"out_of_stock\"");
    }
}
