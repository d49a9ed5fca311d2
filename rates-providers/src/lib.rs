//! # Rates Providers
//!
//! Concrete data-provider implementations (adapters) for the exchange-rates
//! importer. This crate provides HTTP clients that implement the
//! `RateProvider` port.

use async_trait::async_trait;
use rates_types::{ConfigError, ExchangeRate, ProviderError, RateProvider, Source};

pub mod ecb;
pub mod freecurrency;

pub use ecb::EcbProvider;
pub use freecurrency::FreeCurrencyProvider;

/// Settings consumed when resolving a provider from a `Source` value.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    /// API key for freecurrencyapi.com. Required for `Source::FreeCurrencyApi`.
    pub fca_api_key: Option<String>,
    /// Override for the ECB data portal base URL (tests, mirrors).
    pub ecb_base_url: Option<String>,
    /// Override for the FreeCurrencyAPI base URL.
    pub fca_base_url: Option<String>,
}

/// Unified provider wrapper resolved from a `Source` value.
///
/// Every `Source` variant maps to exactly one concrete adapter here; adding a
/// source means adding a variant and one arm in `build_provider`.
pub enum Provider {
    Ecb(EcbProvider),
    FreeCurrency(FreeCurrencyProvider),
}

/// Resolves the concrete data provider for a source.
///
/// Fails with a `ConfigError` before any I/O when a prerequisite setting is
/// missing (the FreeCurrencyAPI key).
pub fn build_provider(source: Source, config: &ProviderConfig) -> Result<Provider, ConfigError> {
    match source {
        Source::Ecb => {
            let mut provider = EcbProvider::new();
            if let Some(url) = &config.ecb_base_url {
                provider = provider.with_base_url(url);
            }
            Ok(Provider::Ecb(provider))
        }
        Source::FreeCurrencyApi => {
            let api_key = config
                .fca_api_key
                .as_deref()
                .ok_or(ConfigError::MissingSetting("FCA_API_KEY"))?;
            let mut provider = FreeCurrencyProvider::new(api_key);
            if let Some(url) = &config.fca_base_url {
                provider = provider.with_base_url(url);
            }
            Ok(Provider::FreeCurrency(provider))
        }
    }
}

#[async_trait]
impl RateProvider for Provider {
    async fn get_exchange_rates(
        &self,
        base_currency: &str,
    ) -> Result<Vec<ExchangeRate>, ProviderError> {
        match self {
            Provider::Ecb(p) => p.get_exchange_rates(base_currency).await,
            Provider::FreeCurrency(p) => p.get_exchange_rates(base_currency).await,
        }
    }
}
