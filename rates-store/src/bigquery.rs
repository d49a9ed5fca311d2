//! BigQuery store adapter.
//!
//! Talks to the BigQuery v2 REST API directly: `jobs/query` for the
//! latest-rates read and streaming `insertAll` for writes. Authentication is
//! a bearer token supplied by configuration; token acquisition (service
//! accounts, metadata server) is the operator's concern.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use rates_types::{ExchangeRate, RateStore, Source, StoreError};

use crate::types::{RateRecord, group_records};

const DEFAULT_API_BASE: &str = "https://bigquery.googleapis.com";

/// Connection settings for the BigQuery backend.
#[derive(Debug, Clone)]
pub struct BigQueryConfig {
    pub project_id: String,
    pub dataset: String,
    pub table: String,
    pub access_token: String,
    /// Override for the API endpoint (tests, emulators).
    pub api_base: Option<String>,
}

/// BigQuery store implementation.
#[derive(Debug)]
pub struct BigQueryStore {
    http: Client,
    config: BigQueryConfig,
    api_base: String,
}

impl BigQueryStore {
    pub fn new(config: BigQueryConfig) -> Self {
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();
        Self {
            http: Client::new(),
            config,
            api_base,
        }
    }

    fn table_ref(&self) -> String {
        format!(
            "`{}.{}.{}`",
            self.config.project_id, self.config.dataset, self.config.table
        )
    }

    fn string_param(name: &str, value: &str) -> Value {
        json!({
            "name": name,
            "parameterType": { "type": "STRING" },
            "parameterValue": { "value": value },
        })
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, StoreError> {
        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.config.access_token)
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(StoreError::Database(format!(
                "BigQuery returned {status}: {text}"
            )));
        }

        resp.json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

/// Extracts flat rows out of a `jobs/query` response.
///
/// BigQuery serialises every cell as a string under `rows[].f[].v`, in the
/// column order of the SELECT.
fn parse_query_rows(response: &Value) -> Result<Vec<RateRecord>, StoreError> {
    let decode = |message: String| StoreError::Decode(message);

    if response.get("jobComplete").and_then(Value::as_bool) == Some(false) {
        return Err(StoreError::Database(
            "BigQuery query did not complete".to_string(),
        ));
    }

    let Some(rows) = response.get("rows").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let cells = row
            .get("f")
            .and_then(Value::as_array)
            .ok_or_else(|| decode("row without cells".to_string()))?;
        let cell = |idx: usize| {
            cells
                .get(idx)
                .and_then(|c| c.get("v"))
                .and_then(Value::as_str)
                .ok_or_else(|| decode(format!("missing cell {idx}")))
        };

        let quote_currency = cell(0)?.to_string();
        let date_cell = cell(1)?;
        let rate_cell = cell(2)?;
        let date: chrono::NaiveDate = date_cell
            .parse()
            .map_err(|_| decode(format!("bad date cell: {date_cell}")))?;
        let rate: f64 = rate_cell
            .parse()
            .map_err(|_| decode(format!("bad rate cell: {rate_cell}")))?;

        records.push(RateRecord {
            quote_currency,
            date,
            rate,
        });
    }
    Ok(records)
}

#[async_trait]
impl RateStore for BigQueryStore {
    async fn get_latest_exchange_rates(
        &self,
        source: Source,
        base_currency: &str,
    ) -> Result<Vec<ExchangeRate>, StoreError> {
        let table = self.table_ref();
        let sql = format!(
            "SELECT e.quote_currency, CAST(e.date AS STRING) AS date, CAST(e.rate AS STRING) AS rate \
             FROM {table} e \
             JOIN ( \
                 SELECT quote_currency, MAX(date) AS max_date \
                 FROM {table} \
                 WHERE source = @source AND base_currency = @base_currency \
                 GROUP BY quote_currency \
             ) latest \
               ON e.quote_currency = latest.quote_currency AND e.date = latest.max_date \
             WHERE e.source = @source AND e.base_currency = @base_currency \
             ORDER BY e.date, e.quote_currency"
        );

        let url = format!(
            "{}/bigquery/v2/projects/{}/queries",
            self.api_base, self.config.project_id
        );
        let body = json!({
            "query": sql,
            "useLegacySql": false,
            "parameterMode": "NAMED",
            "queryParameters": [
                Self::string_param("source", source.as_str()),
                Self::string_param("base_currency", base_currency),
            ],
        });

        let response = self.post_json(&url, &body).await?;
        let records = parse_query_rows(&response)?;

        Ok(group_records(source, base_currency, records))
    }

    async fn insert_exchange_rates(&self, rates: &[ExchangeRate]) -> Result<(), StoreError> {
        let mut rows = Vec::new();
        for rate in rates {
            for (quote_currency, value) in &rate.rates {
                // insertId keyed on the natural key gives best-effort dedup
                // on the streaming buffer.
                let insert_id = format!(
                    "{}:{}:{}:{}",
                    rate.source, rate.base_currency, quote_currency, rate.date
                );
                rows.push(json!({
                    "insertId": insert_id,
                    "json": {
                        "source": rate.source.as_str(),
                        "base_currency": rate.base_currency,
                        "quote_currency": quote_currency,
                        "date": rate.date.to_string(),
                        "rate": value,
                    },
                }));
            }
        }

        if rows.is_empty() {
            return Ok(());
        }

        let url = format!(
            "{}/bigquery/v2/projects/{}/datasets/{}/tables/{}/insertAll",
            self.api_base, self.config.project_id, self.config.dataset, self.config.table
        );
        let body = json!({ "rows": rows });

        let response = self.post_json(&url, &body).await?;
        if let Some(errors) = response.get("insertErrors").and_then(Value::as_array)
            && !errors.is_empty()
        {
            return Err(StoreError::Database(format!(
                "BigQuery rejected {} row(s): {}",
                errors.len(),
                errors[0]
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_rows() {
        let response = json!({
            "jobComplete": true,
            "rows": [
                { "f": [{ "v": "USD" }, { "v": "2022-12-01" }, { "v": "1.0531" }] },
                { "f": [{ "v": "GBP" }, { "v": "2022-12-01" }, { "v": "0.8604" }] },
            ],
        });

        let records = parse_query_rows(&response).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].quote_currency, "USD");
        assert_eq!(records[0].rate, 1.0531);
        assert_eq!(records[1].date, "2022-12-01".parse().unwrap());
    }

    #[test]
    fn test_parse_query_rows_empty_result() {
        let response = json!({ "jobComplete": true, "totalRows": "0" });
        assert!(parse_query_rows(&response).unwrap().is_empty());
    }

    #[test]
    fn test_parse_query_rows_incomplete_job_fails() {
        let response = json!({ "jobComplete": false });
        assert!(matches!(
            parse_query_rows(&response),
            Err(StoreError::Database(_))
        ));
    }

    #[test]
    fn test_parse_query_rows_bad_cell_fails() {
        let response = json!({
            "jobComplete": true,
            "rows": [{ "f": [{ "v": "USD" }, { "v": "yesterday" }, { "v": "1.0" }] }],
        });
        assert!(matches!(
            parse_query_rows(&response),
            Err(StoreError::Decode(_))
        ));
    }
}
