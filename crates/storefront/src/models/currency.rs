//! Currencies and exchange-rate snapshots.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ambra_core::CurrencyCode;

/// A display currency offered in the storefront switcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: CurrencyCode,
    pub symbol: String,
    pub flag: String,
    /// Multiplier against the base currency, used as the offline seed.
    pub multiplier: Decimal,
    /// Marks low-denomination Gulf currencies shown in the "luxury" group.
    #[serde(default)]
    pub luxury: bool,
}

/// An exchange-rate snapshot: multipliers against `base` plus the fetch
/// timestamp that drives the staleness window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    pub base: CurrencyCode,
    pub rates: HashMap<CurrencyCode, Decimal>,
    pub fetched_at: DateTime<Utc>,
    /// Set when the table was served from cache because a live fetch
    /// failed. Never persisted as true.
    #[serde(default, skip_serializing)]
    pub stale: bool,
}

impl RateTable {
    /// Multiplier for a code. The base currency is 1 by definition.
    #[must_use]
    pub fn rate_for(&self, code: &CurrencyCode) -> Option<Decimal> {
        if *code == self.base {
            Some(Decimal::ONE)
        } else {
            self.rates.get(code).copied()
        }
    }

    /// Whether the snapshot is younger than `ttl` at `now`.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        now - self.fetched_at < ttl
    }

    /// The build-time seed table: usable offline from first paint, but
    /// dated to the epoch so the first live fetch always replaces it.
    #[must_use]
    pub fn builtin(base: CurrencyCode) -> Self {
        let rates = supported_currencies()
            .into_iter()
            .map(|currency| (currency.code, currency.multiplier))
            .collect();
        Self {
            base,
            rates,
            fetched_at: DateTime::UNIX_EPOCH,
            stale: false,
        }
    }
}

/// The currencies offered in the switcher, with their offline multipliers
/// against USD.
#[must_use]
pub fn supported_currencies() -> Vec<Currency> {
    fn currency(code: &str, symbol: &str, flag: &str, multiplier: &str, luxury: bool) -> Currency {
        Currency {
            code: CurrencyCode::parse(code).expect("static code is valid"),
            symbol: symbol.to_owned(),
            flag: flag.to_owned(),
            multiplier: multiplier.parse().expect("static multiplier is valid"),
            luxury,
        }
    }

    vec![
        currency("USD", "$", "\u{1f1fa}\u{1f1f8}", "1", false),
        currency("EUR", "\u{20ac}", "\u{1f1ea}\u{1f1fa}", "0.92", false),
        currency("GBP", "\u{a3}", "\u{1f1ec}\u{1f1e7}", "0.79", false),
        currency("AED", "\u{62f}.\u{625}", "\u{1f1e6}\u{1f1ea}", "3.6725", false),
        currency("SAR", "\u{631}.\u{633}", "\u{1f1f8}\u{1f1e6}", "3.75", false),
        currency("QAR", "\u{631}.\u{642}", "\u{1f1f6}\u{1f1e6}", "3.64", false),
        currency("KWD", "\u{62f}.\u{643}", "\u{1f1f0}\u{1f1fc}", "0.3075", true),
        currency("BHD", ".\u{62f}.\u{628}", "\u{1f1e7}\u{1f1ed}", "0.376", true),
        currency("OMR", "\u{631}.\u{639}.", "\u{1f1f4}\u{1f1f2}", "0.3845", true),
    ]
}
