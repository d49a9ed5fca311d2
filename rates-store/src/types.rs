//! Database row types and row→domain grouping shared by the store adapters.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rates_types::{ExchangeRate, Source, StoreError};

/// Backend-independent representation of one stored observation row.
#[derive(Debug, Clone, PartialEq)]
pub struct RateRecord {
    pub quote_currency: String,
    pub date: NaiveDate,
    pub rate: f64,
}

/// Groups flat rows into one `ExchangeRate` per distinct date, sorted by date.
pub fn group_records(
    source: Source,
    base_currency: &str,
    records: Vec<RateRecord>,
) -> Vec<ExchangeRate> {
    let mut by_date: BTreeMap<NaiveDate, BTreeMap<String, f64>> = BTreeMap::new();
    for record in records {
        by_date
            .entry(record.date)
            .or_default()
            .insert(record.quote_currency, record.rate);
    }
    by_date
        .into_iter()
        .map(|(date, rates)| ExchangeRate::new(source, base_currency, date, rates))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend row structs
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite row: dates travel as ISO-8601 TEXT.
#[cfg(feature = "sqlite")]
#[derive(sqlx::FromRow)]
pub struct SqliteRateRow {
    pub quote_currency: String,
    pub date: String,
    pub rate: f64,
}

#[cfg(feature = "sqlite")]
impl SqliteRateRow {
    pub fn into_record(self) -> Result<RateRecord, StoreError> {
        let date: NaiveDate = self
            .date
            .parse()
            .map_err(|_| StoreError::Decode(format!("bad stored date: {}", self.date)))?;
        Ok(RateRecord {
            quote_currency: self.quote_currency,
            date,
            rate: self.rate,
        })
    }
}

/// Postgres row: native DATE column.
#[cfg(feature = "postgres")]
#[derive(sqlx::FromRow)]
pub struct PgRateRow {
    pub quote_currency: String,
    pub date: NaiveDate,
    pub rate: f64,
}

#[cfg(feature = "postgres")]
impl PgRateRow {
    pub fn into_record(self) -> RateRecord {
        RateRecord {
            quote_currency: self.quote_currency,
            date: self.date,
            rate: self.rate,
        }
    }
}
