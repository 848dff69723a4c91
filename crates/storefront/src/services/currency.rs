//! Currency conversion and price formatting.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{instrument, warn};

use ambra_core::{CurrencyCode, Price};

use crate::error::{Result, StoreError};
use crate::local::{LocalStore, keys};
use crate::models::currency::{Currency, RateTable, supported_currencies};
use crate::ports::rates::RateSource;
use crate::ports::ux::{Notifier, Severity};

/// A cached rate table older than this is refetched.
const RATE_STALENESS_WINDOW: TimeDelta = TimeDelta::hours(1);

/// Owns the exchange-rate table and the active display currency.
///
/// The built-in multiplier table seeds the in-memory state so conversion
/// works offline from first paint; the remote table is authoritative once
/// fetched and the seed is never persisted.
pub struct CurrencyService {
    source: Arc<dyn RateSource>,
    local: Arc<dyn LocalStore>,
    notifier: Arc<dyn Notifier>,
    base: CurrencyCode,
    state: Mutex<RateTable>,
}

impl CurrencyService {
    /// Create the service, seeding from the persisted snapshot when one
    /// exists for the same base, else from the built-in table.
    pub fn new(
        source: Arc<dyn RateSource>,
        local: Arc<dyn LocalStore>,
        notifier: Arc<dyn Notifier>,
        base: CurrencyCode,
    ) -> Self {
        let table = local
            .read(keys::CACHED_RATES)
            .and_then(|raw| match serde_json::from_str::<RateTable>(&raw) {
                Ok(table) if table.base == base => Some(table),
                Ok(_) => {
                    warn!("discarding persisted rates for a different base currency");
                    None
                }
                Err(err) => {
                    warn!(error = %err, "discarding unreadable persisted rates");
                    None
                }
            })
            .unwrap_or_else(|| RateTable::builtin(base.clone()));

        Self {
            source,
            local,
            notifier,
            base,
            state: Mutex::new(table),
        }
    }

    /// The current multiplier table.
    ///
    /// Served from cache when fetched within the staleness window;
    /// otherwise refetched and persisted. A failed fetch falls back to a
    /// stale-but-present cache (flagged `stale`); with nothing ever
    /// fetched it is a hard error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transient`] when the fetch fails and no
    /// previously fetched table exists.
    #[instrument(skip(self))]
    pub async fn rates(&self) -> Result<RateTable> {
        let cached = self.lock().clone();
        let now = Utc::now();
        if cached.is_fresh(now, RATE_STALENESS_WINDOW) {
            return Ok(cached);
        }

        match self.source.fetch(&self.base).await {
            Ok(rates) => {
                let table = RateTable {
                    base: self.base.clone(),
                    rates,
                    fetched_at: now,
                    stale: false,
                };
                self.persist(&table);
                *self.lock() = table.clone();
                Ok(table)
            }
            Err(err) => {
                warn!(error = %err, "rate fetch failed");
                // The built-in seed is dated to the epoch; only a table
                // that was actually fetched counts as a cache.
                if cached.fetched_at > DateTime::UNIX_EPOCH {
                    self.notifier
                        .notify(Severity::Warning, "Exchange rates may be out of date");
                    let mut stale = cached;
                    stale.stale = true;
                    Ok(stale)
                } else {
                    self.notifier
                        .notify(Severity::Error, "Could not load exchange rates");
                    Err(StoreError::Transient(err.to_string()))
                }
            }
        }
    }

    /// Convert an amount between two supported currencies using the
    /// in-memory table.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for a code the table does not
    /// carry.
    pub fn convert(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Decimal> {
        let table = self.lock().clone();
        let from_rate = table
            .rate_for(from)
            .ok_or_else(|| StoreError::Validation(format!("unsupported currency: {from}")))?;
        let to_rate = table
            .rate_for(to)
            .ok_or_else(|| StoreError::Validation(format!("unsupported currency: {to}")))?;
        Ok(amount * to_rate / from_rate)
    }

    /// Convert a base-currency catalog amount into a display [`Price`] in
    /// the requested currency.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for an unsupported code or a
    /// negative amount.
    pub fn price_in(&self, amount: Decimal, code: &CurrencyCode) -> Result<Price> {
        let converted = self.convert(amount, &self.base, code)?;
        Price::new(converted, code.clone()).map_err(|err| StoreError::Validation(err.to_string()))
    }

    /// The currencies offered in the switcher.
    #[must_use]
    pub fn supported(&self) -> Vec<Currency> {
        supported_currencies()
    }

    /// The persisted display-currency preference, defaulting to the base.
    #[must_use]
    pub fn active_currency(&self) -> CurrencyCode {
        self.local
            .read(keys::CURRENCY)
            .and_then(|raw| CurrencyCode::parse(raw.trim()).ok())
            .unwrap_or_else(|| self.base.clone())
    }

    /// Persist the display-currency preference.
    pub fn set_active_currency(&self, code: &CurrencyCode) {
        if let Err(err) = self.local.write(keys::CURRENCY, code.as_str()) {
            warn!(error = %err, "failed to persist currency preference");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RateTable> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn persist(&self, table: &RateTable) {
        match serde_json::to_string(table) {
            Ok(raw) => {
                if let Err(err) = self.local.write(keys::CACHED_RATES, &raw) {
                    warn!(error = %err, "failed to persist rates");
                }
            }
            Err(err) => warn!(error = %err, "failed to serialize rates"),
        }
    }
}

struct LocaleFormat {
    symbol: &'static str,
    symbol_first: bool,
    spaced: bool,
    group_sep: char,
    decimal_sep: char,
    decimals: u32,
}

/// Fixed code → locale table. Unknown codes fall back to a baseline
/// format with the code itself as the symbol.
fn locale_format(code: &CurrencyCode) -> Option<LocaleFormat> {
    let format = match code.as_str() {
        "USD" => LocaleFormat {
            symbol: "$",
            symbol_first: true,
            spaced: false,
            group_sep: ',',
            decimal_sep: '.',
            decimals: 2,
        },
        "GBP" => LocaleFormat {
            symbol: "\u{a3}",
            symbol_first: true,
            spaced: false,
            group_sep: ',',
            decimal_sep: '.',
            decimals: 2,
        },
        "EUR" => LocaleFormat {
            symbol: "\u{20ac}",
            symbol_first: false,
            spaced: true,
            group_sep: '.',
            decimal_sep: ',',
            decimals: 2,
        },
        "AED" => LocaleFormat {
            symbol: "\u{62f}.\u{625}",
            symbol_first: false,
            spaced: true,
            group_sep: ',',
            decimal_sep: '.',
            decimals: 2,
        },
        "SAR" => LocaleFormat {
            symbol: "\u{631}.\u{633}",
            symbol_first: false,
            spaced: true,
            group_sep: ',',
            decimal_sep: '.',
            decimals: 2,
        },
        "QAR" => LocaleFormat {
            symbol: "\u{631}.\u{642}",
            symbol_first: false,
            spaced: true,
            group_sep: ',',
            decimal_sep: '.',
            decimals: 2,
        },
        "KWD" => LocaleFormat {
            symbol: "\u{62f}.\u{643}",
            symbol_first: false,
            spaced: true,
            group_sep: ',',
            decimal_sep: '.',
            decimals: 3,
        },
        "BHD" => LocaleFormat {
            symbol: ".\u{62f}.\u{628}",
            symbol_first: false,
            spaced: true,
            group_sep: ',',
            decimal_sep: '.',
            decimals: 3,
        },
        "OMR" => LocaleFormat {
            symbol: "\u{631}.\u{639}.",
            symbol_first: false,
            spaced: true,
            group_sep: ',',
            decimal_sep: '.',
            decimals: 3,
        },
        _ => return None,
    };
    Some(format)
}

/// Locale-aware price formatting: grouping separators, decimal separator,
/// minor-unit digits and symbol placement per the fixed locale table.
#[must_use]
pub fn format_price(amount: Decimal, code: &CurrencyCode) -> String {
    locale_format(code).map_or_else(
        || {
            let digits = format_digits(amount, ',', '.', 2);
            format!("{digits} {code}")
        },
        |format| {
            let digits = format_digits(
                amount,
                format.group_sep,
                format.decimal_sep,
                format.decimals,
            );
            match (format.symbol_first, format.spaced) {
                (true, true) => format!("{} {digits}", format.symbol),
                (true, false) => format!("{}{digits}", format.symbol),
                (false, true) => format!("{digits} {}", format.symbol),
                (false, false) => format!("{digits}{}", format.symbol),
            }
        },
    )
}

fn format_digits(amount: Decimal, group_sep: char, decimal_sep: char, decimals: u32) -> String {
    let rounded = amount
        .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
        .abs();
    let raw = format!("{rounded:.prec$}", prec = decimals as usize);
    let (integral, fraction) = raw.split_once('.').unwrap_or((raw.as_str(), ""));

    let mut grouped = String::with_capacity(raw.len() + integral.len() / 3);
    for (position, digit) in integral.chars().enumerate() {
        if position > 0 && (integral.len() - position) % 3 == 0 {
            grouped.push(group_sep);
        }
        grouped.push(digit);
    }

    let sign = if amount.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    if decimals == 0 {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}{decimal_sep}{fraction}")
    }
}
