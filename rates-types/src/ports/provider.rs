//! Data-provider port.
//!
//! This trait defines the interface for fetching exchange rates from an
//! external source. Implementations can be HTTP clients, mock providers, etc.

use crate::domain::ExchangeRate;
use crate::error::ProviderError;

/// Port trait for exchange-rate data providers.
#[async_trait::async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches the newest exchange rates for the given base currency.
    ///
    /// Returns `ProviderError::NoNewData` when the source has nothing new to
    /// offer; the importer treats that case as recoverable. Any other error
    /// aborts the run.
    async fn get_exchange_rates(
        &self,
        base_currency: &str,
    ) -> Result<Vec<ExchangeRate>, ProviderError>;
}
