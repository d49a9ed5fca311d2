//! SQLite store adapter.

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::str::FromStr;

use rates_types::{ExchangeRate, RateStore, Source, StoreError};

use crate::types::{SqliteRateRow, group_records};

const LATEST_SQL: &str = r#"
SELECT e.quote_currency, e.date, e.rate
FROM exchange_rates e
JOIN (
    SELECT quote_currency, MAX(date) AS max_date
    FROM exchange_rates
    WHERE source = ? AND base_currency = ?
    GROUP BY quote_currency
) latest
  ON e.quote_currency = latest.quote_currency AND e.date = latest.max_date
WHERE e.source = ? AND e.base_currency = ?
ORDER BY e.date, e.quote_currency
"#;

/// SQLite store implementation.
#[derive(Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Creates a new SQLite store with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        let ddl = include_str!("../migrations/sqlite/0001_create_exchange_rates.sql");
        sqlx::query(ddl).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl RateStore for SqliteStore {
    async fn get_latest_exchange_rates(
        &self,
        source: Source,
        base_currency: &str,
    ) -> Result<Vec<ExchangeRate>, StoreError> {
        let source_str = source.to_string();

        let rows: Vec<SqliteRateRow> = sqlx::query_as(LATEST_SQL)
            .bind(&source_str)
            .bind(base_currency)
            .bind(&source_str)
            .bind(base_currency)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let records = rows
            .into_iter()
            .map(SqliteRateRow::into_record)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(group_records(source, base_currency, records))
    }

    async fn insert_exchange_rates(&self, rates: &[ExchangeRate]) -> Result<(), StoreError> {
        let mut db_tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Transaction(e.to_string()))?;

        for rate in rates {
            let source_str = rate.source.to_string();
            let date_str = rate.date.to_string();

            for (quote_currency, value) in &rate.rates {
                sqlx::query(
                    r#"INSERT INTO exchange_rates (source, base_currency, quote_currency, date, rate)
                       VALUES (?, ?, ?, ?, ?)
                       ON CONFLICT (source, base_currency, quote_currency, date)
                       DO UPDATE SET rate = excluded.rate"#,
                )
                .bind(&source_str)
                .bind(&rate.base_currency)
                .bind(quote_currency)
                .bind(&date_str)
                .bind(value)
                .execute(&mut *db_tx)
                .await
                .map_err(|e| StoreError::Database(e.to_string()))?;
            }
        }

        db_tx
            .commit()
            .await
            .map_err(|e| StoreError::Transaction(e.to_string()))?;

        Ok(())
    }
}
