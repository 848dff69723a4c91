//! Domain model types for the storefront state layer.

pub mod cart;
pub mod content;
pub mod currency;
pub mod offer;
pub mod product;
pub mod session;
pub mod wishlist;

pub use cart::{CartItem, CartTotals};
pub use content::{BrandTile, HeroBanner, HomepageContent, MarqueeBrand, Section, SiteSettings};
pub use currency::{Currency, RateTable};
pub use offer::Offer;
pub use product::{FragranceNotes, Product};
pub use session::{
    AdminRecord, AdminSession, CustomerProfile, CustomerSession, Principal, RouteClass,
};
pub use wishlist::WishlistItem;
