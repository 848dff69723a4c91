//! Storefront services.
//!
//! Each service owns one concern's in-memory state and its mutation
//! contract. Services are constructed once at session start with their
//! ports injected and passed by reference; mutations update memory first,
//! then mirror to the durable local store or schedule the remote write.

pub mod cart;
pub mod catalog;
pub mod content;
pub mod currency;
pub mod session;
pub mod wishlist;

pub use cart::CartService;
pub use catalog::{CatalogService, DataSource, FilterOptions, SortKey};
pub use content::ContentService;
pub use currency::CurrencyService;
pub use session::{CustomerCredentials, SessionService};
pub use wishlist::{ShareOwner, WishlistService};
