//! Postgres store adapter.

use async_trait::async_trait;
use sqlx::PgPool;

use rates_types::{ExchangeRate, RateStore, Source, StoreError};

use crate::types::{PgRateRow, group_records};

const LATEST_SQL: &str = r#"
SELECT e.quote_currency, e.date, e.rate
FROM exchange_rates e
JOIN (
    SELECT quote_currency, MAX(date) AS max_date
    FROM exchange_rates
    WHERE source = $1 AND base_currency = $2
    GROUP BY quote_currency
) latest
  ON e.quote_currency = latest.quote_currency AND e.date = latest.max_date
WHERE e.source = $1 AND e.base_currency = $2
ORDER BY e.date, e.quote_currency
"#;

/// Postgres store implementation.
#[derive(Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new Postgres store with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;

        let ddl = include_str!("../migrations/postgres/0001_create_exchange_rates.sql");
        sqlx::query(ddl).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RateStore for PostgresStore {
    async fn get_latest_exchange_rates(
        &self,
        source: Source,
        base_currency: &str,
    ) -> Result<Vec<ExchangeRate>, StoreError> {
        let rows: Vec<PgRateRow> = sqlx::query_as(LATEST_SQL)
            .bind(source.to_string())
            .bind(base_currency)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let records = rows.into_iter().map(PgRateRow::into_record).collect();

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

            for (quote_currency, value) in &rate.rates {
                sqlx::query(
                    r#"INSERT INTO exchange_rates (source, base_currency, quote_currency, date, rate)
                       VALUES ($1, $2, $3, $4, $5)
                       ON CONFLICT (source, base_currency, quote_currency, date)
                       DO UPDATE SET rate = EXCLUDED.rate"#,
                )
                .bind(&source_str)
                .bind(&rate.base_currency)
                .bind(quote_currency)
                .bind(rate.date)
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
