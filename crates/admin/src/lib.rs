//! Ambra Admin - administrative console services.
//!
//! This crate holds the store-management side of Ambra: access guards for
//! the console's routes, homepage/offer editing, product management and
//! media upload. It shares the storefront's port traits and error
//! taxonomy; every remote operation goes through the same injected
//! collaborators.
//!
//! # Modules
//!
//! - [`guard`] - Pure access decisions from route class and principal
//! - [`content`] - Homepage section and offer editing
//! - [`catalog`] - Product create/update/delete with invariant checks
//! - [`media`] - Product and marketing image upload

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod content;
pub mod guard;
pub mod media;

pub use catalog::{CatalogAdmin, ProductDraft};
pub use content::{ContentAdmin, OfferDraft};
pub use guard::{AccessDecision, ReasonCode};
pub use media::MediaService;
