//! Ambra Storefront - commerce state layer.
//!
//! This crate holds the customer-facing state of the store: the cart,
//! the wishlist, the product catalog cache, currency conversion, the
//! homepage/offers content and the authenticated session. Every hard
//! operation (queries, auth, file storage) is delegated to the hosted
//! backend through the port traits in [`ports`]; this crate owns the
//! in-memory state, the derived values and the local-cache fallback
//! behavior.
//!
//! # Architecture
//!
//! Services are constructed once at session start and passed by
//! reference; each owns its state behind a mutex and mirrors it to the
//! durable [`local`] store after every mutation. Remote reads degrade to
//! the most recent local snapshot when the backend is unreachable.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod error;
pub mod local;
pub mod models;
pub mod ports;
pub mod presentation;
pub mod services;

pub use error::{Result, StoreError};
