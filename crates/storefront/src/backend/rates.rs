//! HTTP exchange-rate source.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{instrument, warn};

use ambra_core::CurrencyCode;

use crate::ports::rates::{RateSource, RateSourceError};

/// Fetches multiplier tables from a JSON rate provider.
///
/// Expects the common `{"base": "USD", "rates": {"AED": 3.6725, …}}` shape.
#[derive(Clone)]
pub struct HttpRateSource {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct RatesPayload {
    rates: HashMap<String, Decimal>,
}

impl HttpRateSource {
    /// Create a source against the given endpoint URL.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    #[instrument(skip(self), fields(base = %base))]
    async fn fetch(
        &self,
        base: &CurrencyCode,
    ) -> Result<HashMap<CurrencyCode, Decimal>, RateSourceError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("base", base.as_str())])
            .send()
            .await
            .map_err(|err| RateSourceError::Unavailable(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateSourceError::Unavailable(format!("HTTP {status}")));
        }

        let payload: RatesPayload = response
            .json()
            .await
            .map_err(|err| RateSourceError::Unavailable(err.to_string()))?;

        let mut rates = HashMap::with_capacity(payload.rates.len());
        for (code, rate) in payload.rates {
            match CurrencyCode::parse(&code) {
                Ok(code) => {
                    rates.insert(code, rate);
                }
                Err(err) => warn!(code, error = %err, "skipping unparseable currency code"),
            }
        }
        Ok(rates)
    }
}
