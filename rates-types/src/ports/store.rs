//! Storage port.
//!
//! This is the persistence port of the hexagonal architecture.
//! Adapters (SQLite, Postgres, BigQuery) implement this trait.

use crate::domain::{ExchangeRate, Source};
use crate::error::StoreError;

/// Port trait for rate storage backends.
#[async_trait::async_trait]
pub trait RateStore: Send + Sync {
    /// Returns the most recent stored record per quote currency for the given
    /// source and base currency, grouped into one `ExchangeRate` per distinct
    /// date. Empty when nothing has been stored yet.
    async fn get_latest_exchange_rates(
        &self,
        source: Source,
        base_currency: &str,
    ) -> Result<Vec<ExchangeRate>, StoreError>;

    /// Persists the given records. Duplicate (source, base, quote, date)
    /// tuples are upserted rather than duplicated.
    async fn insert_exchange_rates(&self, rates: &[ExchangeRate]) -> Result<(), StoreError>;
}
