//! ECB data-portal adapter.
//!
//! Pulls daily reference rates from the ECB SDMX REST API in `csvdata`
//! format. The EXR dataflow only quotes against EUR, so any other base
//! currency is rejected up front.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rates_types::{ExchangeRate, ProviderError, RateProvider, Source};
use reqwest::{Client, StatusCode};

const DEFAULT_BASE_URL: &str = "https://data-api.ecb.europa.eu/service/data";

/// ECB reference-rate provider.
pub struct EcbProvider {
    http: Client,
    base_url: String,
}

impl EcbProvider {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Overrides the data portal base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl Default for EcbProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl RateProvider for EcbProvider {
    async fn get_exchange_rates(
        &self,
        base_currency: &str,
    ) -> Result<Vec<ExchangeRate>, ProviderError> {
        if base_currency != "EUR" {
            return Err(ProviderError::UnsupportedBaseCurrency {
                source: Source::Ecb,
                base_currency: base_currency.to_string(),
            });
        }

        // D..EUR.SP00.A = daily frequency, all quote currencies, EUR denominator.
        let url = format!(
            "{}/EXR/D..EUR.SP00.A?format=csvdata&lastNObservations=1",
            self.base_url
        );

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Http {
                source: Source::Ecb,
                message: e.to_string(),
            })?;

        // The SDMX API answers 404 when the query matches no observations.
        if resp.status() == StatusCode::NOT_FOUND || resp.status() == StatusCode::NO_CONTENT {
            return Err(ProviderError::NoNewData { source: Source::Ecb });
        }
        if !resp.status().is_success() {
            return Err(ProviderError::Http {
                source: Source::Ecb,
                message: format!("unexpected status {}", resp.status()),
            });
        }

        let body = resp.text().await.map_err(|e| ProviderError::Http {
            source: Source::Ecb,
            message: e.to_string(),
        })?;

        let rates = parse_csvdata(&body)?;
        if rates.is_empty() {
            return Err(ProviderError::NoNewData { source: Source::Ecb });
        }

        tracing::debug!(batches = rates.len(), "fetched ECB reference rates");
        Ok(rates)
    }
}

/// Parses an SDMX `csvdata` payload into per-date rate batches.
///
/// Only the CURRENCY, TIME_PERIOD and OBS_VALUE columns are consumed;
/// observations with an empty OBS_VALUE (unpublished rates) are skipped.
fn parse_csvdata(body: &str) -> Result<Vec<ExchangeRate>, ProviderError> {
    let decode = |message: String| ProviderError::Decode {
        source: Source::Ecb,
        message,
    };

    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_reader(body.as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| decode(e.to_string()))?
        .clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| decode(format!("missing column {name}")))
    };
    let currency_idx = column("CURRENCY")?;
    let period_idx = column("TIME_PERIOD")?;
    let value_idx = column("OBS_VALUE")?;

    let mut by_date: BTreeMap<NaiveDate, BTreeMap<String, f64>> = BTreeMap::new();
    for record in reader.records() {
        let record = record.map_err(|e| decode(e.to_string()))?;
        let field = |idx: usize| {
            record
                .get(idx)
                .ok_or_else(|| decode("short record".to_string()))
        };

        let value = field(value_idx)?;
        if value.is_empty() {
            continue;
        }
        let rate: f64 = value
            .parse()
            .map_err(|_| decode(format!("bad OBS_VALUE: {value}")))?;
        let period = field(period_idx)?;
        let date: NaiveDate = period
            .parse()
            .map_err(|_| decode(format!("bad TIME_PERIOD: {period}")))?;
        let currency = field(currency_idx)?.to_string();

        by_date.entry(date).or_default().insert(currency, rate);
    }

    Ok(by_date
        .into_iter()
        .map(|(date, rates)| ExchangeRate::new(Source::Ecb, "EUR", date, rates))
        .collect())
}
