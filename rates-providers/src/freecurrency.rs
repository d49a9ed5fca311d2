//! freecurrencyapi.com adapter.
//!
//! The `/v1/latest` endpoint returns a flat currency→rate object for the
//! requested base currency. The API does not date its snapshot, so records
//! are stamped with the current UTC day at fetch time.

use std::collections::BTreeMap;

use chrono::Utc;
use rates_types::{ExchangeRate, ProviderError, RateProvider, Source};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://api.freecurrencyapi.com";

/// FreeCurrencyAPI provider.
pub struct FreeCurrencyProvider {
    http: Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct LatestResponse {
    data: BTreeMap<String, f64>,
}

impl FreeCurrencyProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Overrides the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait::async_trait]
impl RateProvider for FreeCurrencyProvider {
    async fn get_exchange_rates(
        &self,
        base_currency: &str,
    ) -> Result<Vec<ExchangeRate>, ProviderError> {
        let url = format!("{}/v1/latest", self.base_url);

        let resp = self
            .http
            .get(&url)
            .query(&[("apikey", self.api_key.as_str()), ("base_currency", base_currency)])
            .send()
            .await
            .map_err(|e| ProviderError::Http {
                source: Source::FreeCurrencyApi,
                message: e.to_string(),
            })?;

        // 422 is the API's answer to a base currency it does not serve.
        if resp.status() == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(ProviderError::UnsupportedBaseCurrency {
                source: Source::FreeCurrencyApi,
                base_currency: base_currency.to_string(),
            });
        }
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(ProviderError::NoNewData {
                source: Source::FreeCurrencyApi,
            });
        }
        if !resp.status().is_success() {
            return Err(ProviderError::Http {
                source: Source::FreeCurrencyApi,
                message: format!("unexpected status {}", resp.status()),
            });
        }

        let payload: LatestResponse = resp.json().await.map_err(|e| ProviderError::Decode {
            source: Source::FreeCurrencyApi,
            message: e.to_string(),
        })?;

        let rate = batch_from_data(base_currency, payload.data).ok_or(ProviderError::NoNewData {
            source: Source::FreeCurrencyApi,
        })?;

        tracing::debug!(quotes = rate.len(), "fetched FreeCurrencyAPI rates");
        Ok(vec![rate])
    }
}

/// Builds the single dated batch out of the latest-rates object.
///
/// The base currency itself appears in the response with rate 1.0 and is
/// dropped. Returns `None` when nothing usable remains.
fn batch_from_data(base_currency: &str, mut data: BTreeMap<String, f64>) -> Option<ExchangeRate> {
    data.remove(base_currency);
    if data.is_empty() {
        return None;
    }
    Some(ExchangeRate::new(
        Source::FreeCurrencyApi,
        base_currency,
        Utc::now().date_naive(),
        data,
    ))
}
