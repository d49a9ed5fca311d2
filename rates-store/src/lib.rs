//! # Rates Store
//!
//! Concrete storage implementations (adapters) for the exchange-rates
//! importer. This crate provides backends that implement the `RateStore`
//! port, selected at runtime from a `StorageType` value.

#[cfg(not(any(feature = "sqlite", feature = "postgres", feature = "bigquery")))]
compile_error!("Enable a store feature: `sqlite`, `postgres` or `bigquery`.");

use async_trait::async_trait;
use rates_types::{ConfigError, ExchangeRate, RateStore, Source, StorageType, StoreError};

#[cfg(feature = "bigquery")]
pub mod bigquery;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

mod types;

#[cfg(feature = "sqlite")]
#[cfg(test)]
mod sqlite_tests;

#[cfg(feature = "bigquery")]
pub use bigquery::{BigQueryConfig, BigQueryStore};
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

/// Settings consumed when resolving a store from a `StorageType` value.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Connection URL for the SQL backends.
    pub database_url: Option<String>,
    /// BigQuery connection settings.
    #[cfg(feature = "bigquery")]
    pub bigquery: Option<BigQueryConfig>,
}

/// Unified store wrapper resolved from a `StorageType` value.
///
/// Every `StorageType` variant maps to exactly one adapter; a backend whose
/// feature is not compiled in fails resolution with a `ConfigError`.
#[derive(Debug)]
pub enum Store {
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteStore),
    #[cfg(feature = "postgres")]
    Postgres(PostgresStore),
    #[cfg(feature = "bigquery")]
    BigQuery(BigQueryStore),
}

/// Resolves and initialises the storage backend for a storage type.
///
/// Configuration problems (backend not compiled in, missing URL or BigQuery
/// settings) surface as `ConfigError` before any connection is opened; the
/// SQL backends then connect and run their migration.
pub async fn build_store(
    storage_type: StorageType,
    config: &StoreConfig,
) -> anyhow::Result<Store> {
    match storage_type {
        #[cfg(feature = "sqlite")]
        StorageType::Sqlite => {
            let url = require_database_url(config)?;
            Ok(Store::Sqlite(SqliteStore::new(url).await?))
        }
        #[cfg(feature = "postgres")]
        StorageType::Postgres => {
            let url = require_database_url(config)?;
            Ok(Store::Postgres(PostgresStore::new(url).await?))
        }
        #[cfg(feature = "bigquery")]
        StorageType::BigQuery => {
            let bq = config
                .bigquery
                .clone()
                .ok_or(ConfigError::MissingSetting("BigQuery settings"))?;
            Ok(Store::BigQuery(BigQueryStore::new(bq)))
        }
        #[allow(unreachable_patterns)]
        other => Err(ConfigError::StorageNotEnabled(other.as_str()).into()),
    }
}

fn require_database_url(config: &StoreConfig) -> Result<&str, ConfigError> {
    config
        .database_url
        .as_deref()
        .ok_or(ConfigError::MissingSetting("DATABASE_URL"))
}

#[async_trait]
impl RateStore for Store {
    async fn get_latest_exchange_rates(
        &self,
        source: Source,
        base_currency: &str,
    ) -> Result<Vec<ExchangeRate>, StoreError> {
        match self {
            #[cfg(feature = "sqlite")]
            Store::Sqlite(s) => s.get_latest_exchange_rates(source, base_currency).await,
            #[cfg(feature = "postgres")]
            Store::Postgres(s) => s.get_latest_exchange_rates(source, base_currency).await,
            #[cfg(feature = "bigquery")]
            Store::BigQuery(s) => s.get_latest_exchange_rates(source, base_currency).await,
        }
    }

    async fn insert_exchange_rates(&self, rates: &[ExchangeRate]) -> Result<(), StoreError> {
        match self {
            #[cfg(feature = "sqlite")]
            Store::Sqlite(s) => s.insert_exchange_rates(rates).await,
            #[cfg(feature = "postgres")]
            Store::Postgres(s) => s.insert_exchange_rates(rates).await,
            #[cfg(feature = "bigquery")]
            Store::BigQuery(s) => s.insert_exchange_rates(rates).await,
        }
    }
}
