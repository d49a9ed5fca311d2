//! Exchange-rate observation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Source;

/// One batch of rate observations for a (source, base currency, date) tuple.
///
/// All rates are expressed against `base_currency`; the map is keyed by the
/// quote-currency code. A `BTreeMap` keeps iteration deterministic, which the
/// store adapters rely on for stable insert ordering.
///
/// After an import cycle a given (source, base_currency, date) tuple is
/// expected to be unique in storage; the adapters enforce this with an upsert
/// on the per-quote natural key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub source: Source,
    pub base_currency: String,
    pub date: NaiveDate,
    pub rates: BTreeMap<String, f64>,
}

impl ExchangeRate {
    pub fn new(
        source: Source,
        base_currency: impl Into<String>,
        date: NaiveDate,
        rates: BTreeMap<String, f64>,
    ) -> Self {
        Self {
            source,
            base_currency: base_currency.into(),
            date,
            rates,
        }
    }

    /// Returns the rate for a single quote currency, if present.
    pub fn rate(&self, quote_currency: &str) -> Option<f64> {
        self.rates.get(quote_currency).copied()
    }

    /// Number of quote currencies in this observation.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
