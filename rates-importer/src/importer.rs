//! Import-cycle orchestration.

use rates_types::{ImportError, ProviderError, RateProvider, RateStore, Source};

use crate::reconcile::ReconcilePolicy;

/// Runs one import cycle: fetch new rates, read the latest stored state,
/// reconcile, persist.
///
/// Generic over `P: RateProvider` and `S: RateStore` - the adapters are
/// injected at construction. This enables:
/// - Swapping sources and backends without code changes
/// - Testing with in-memory mocks
/// - Compile-time checks for port implementation
///
/// One importer value is built per run; it holds no state beyond its
/// configuration.
pub struct RatesImporter<P: RateProvider, S: RateStore> {
    source: Source,
    base_currency: String,
    provider: P,
    store: S,
    policy: ReconcilePolicy,
}

impl<P: RateProvider, S: RateStore> RatesImporter<P, S> {
    /// Creates a new importer with resolved collaborators.
    pub fn new(
        source: Source,
        base_currency: impl Into<String>,
        provider: P,
        store: S,
        policy: ReconcilePolicy,
    ) -> Self {
        Self {
            source,
            base_currency: base_currency.into(),
            provider,
            store,
            policy,
        }
    }

    pub fn source(&self) -> Source {
        self.source
    }

    /// Returns a reference to the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs one import cycle. The side effect is the persisted write.
    ///
    /// A `NoNewData` fetch result is the only recoverable failure: the cycle
    /// continues with an empty batch so the reconcile policy can still fill
    /// from stored values. Every other provider or store error aborts the run.
    /// No retries, no partial-failure recovery.
    pub async fn run_import(&self) -> Result<(), ImportError> {
        let new_rates = match self.provider.get_exchange_rates(&self.base_currency).await {
            Ok(rates) => rates,
            Err(ProviderError::NoNewData { source }) => {
                tracing::warn!(
                    %source,
                    "no new exchange rates; trying to fill missing records \
                     with the latest available values from the past"
                );
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        let latest_in_db = self
            .store
            .get_latest_exchange_rates(self.source, &self.base_currency)
            .await?;

        let to_save = self.policy.reconcile(new_rates, &latest_in_db);

        tracing::info!(
            source = %self.source,
            base_currency = %self.base_currency,
            batches = to_save.len(),
            "persisting reconciled exchange rates"
        );
        self.store.insert_exchange_rates(&to_save).await?;

        Ok(())
    }
}
