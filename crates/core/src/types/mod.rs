//! Core types for Ambra.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod status;
pub mod text;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, CurrencyCodeError, Price, PriceError};
pub use status::*;
pub use text::{Language, LocalizedText, TextError};
