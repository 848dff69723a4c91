//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices are stored as [`rust_decimal::Decimal`] amounts in the
//! store's base currency; a [`Price`] pairs an amount with an explicit
//! [`CurrencyCode`] for anything that leaves the base-currency world
//! (display, conversion, offers).

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CurrencyCode`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum CurrencyCodeError {
    /// The code is not exactly three characters.
    #[error("currency code must be exactly 3 letters, got {0:?}")]
    WrongLength(String),
    /// The code contains non-alphabetic characters.
    #[error("currency code must be ASCII letters only, got {0:?}")]
    NotAlphabetic(String),
}

/// An ISO 4217-style currency code (e.g. `USD`, `AED`, `KWD`).
///
/// Stored uppercased; comparison is therefore case-insensitive at the
/// parsing boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse a currency code, uppercasing the input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly three ASCII letters.
    pub fn parse(s: &str) -> Result<Self, CurrencyCodeError> {
        if s.len() != 3 {
            return Err(CurrencyCodeError::WrongLength(s.to_owned()));
        }
        if !s.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CurrencyCodeError::NotAlphabetic(s.to_owned()));
        }
        Ok(Self(s.to_ascii_uppercase()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = CurrencyCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The amount is negative.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
}

/// A non-negative monetary amount with its currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g. dollars, not cents).
    pub amount: Decimal,
    /// Currency the amount is denominated in.
    pub currency: CurrencyCode,
}

impl Price {
    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for amounts below zero.
    pub fn new(amount: Decimal, currency: CurrencyCode) -> Result<Self, PriceError> {
        if amount < Decimal::ZERO {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self { amount, currency })
    }
}
