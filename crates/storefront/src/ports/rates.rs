//! Exchange-rate source port.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use ambra_core::CurrencyCode;

/// Errors surfaced by the rate source.
#[derive(Debug, Error)]
pub enum RateSourceError {
    /// The source could not be reached or returned an unusable payload.
    #[error("rate source unavailable: {0}")]
    Unavailable(String),
}

/// Remote provider of currency multipliers against a base currency.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetch the multiplier table. The base currency maps to 1 by
    /// definition; the provider may or may not include it.
    async fn fetch(
        &self,
        base: &CurrencyCode,
    ) -> Result<HashMap<CurrencyCode, Decimal>, RateSourceError>;
}
