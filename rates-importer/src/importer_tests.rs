//! RatesImporter unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use rates_types::{
        ExchangeRate, ImportError, ProviderError, RateProvider, RateStore, Source, StoreError,
    };

    use crate::{RatesImporter, ReconcilePolicy};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn batch(source: Source, base: &str, day: &str, rates: &[(&str, f64)]) -> ExchangeRate {
        ExchangeRate::new(
            source,
            base,
            date(day),
            rates
                .iter()
                .map(|(q, r)| (q.to_string(), *r))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    /// Provider that yields a preloaded response once.
    pub struct MockProvider {
        response: Mutex<Option<Result<Vec<ExchangeRate>, ProviderError>>>,
    }

    impl MockProvider {
        pub fn returning(result: Result<Vec<ExchangeRate>, ProviderError>) -> Self {
            Self {
                response: Mutex::new(Some(result)),
            }
        }
    }

    #[async_trait]
    impl RateProvider for MockProvider {
        async fn get_exchange_rates(
            &self,
            _base_currency: &str,
        ) -> Result<Vec<ExchangeRate>, ProviderError> {
            self.response
                .lock()
                .unwrap()
                .take()
                .expect("provider called more than once")
        }
    }

    /// In-memory store that records every call for assertions.
    pub struct MockStore {
        latest: Vec<ExchangeRate>,
        pub read_calls: Mutex<usize>,
        pub inserted: Mutex<Vec<Vec<ExchangeRate>>>,
    }

    impl MockStore {
        pub fn with_latest(latest: Vec<ExchangeRate>) -> Self {
            Self {
                latest,
                read_calls: Mutex::new(0),
                inserted: Mutex::new(Vec::new()),
            }
        }

        pub fn empty() -> Self {
            Self::with_latest(Vec::new())
        }
    }

    #[async_trait]
    impl RateStore for MockStore {
        async fn get_latest_exchange_rates(
            &self,
            _source: Source,
            _base_currency: &str,
        ) -> Result<Vec<ExchangeRate>, StoreError> {
            *self.read_calls.lock().unwrap() += 1;
            Ok(self.latest.clone())
        }

        async fn insert_exchange_rates(&self, rates: &[ExchangeRate]) -> Result<(), StoreError> {
            self.inserted.lock().unwrap().push(rates.to_vec());
            Ok(())
        }
    }

    fn stamp(day: &str) -> ReconcilePolicy {
        ReconcilePolicy::StampAsOf { as_of: date(day) }
    }

    #[tokio::test]
    async fn test_import_stamps_and_persists_fetched_records() {
        // Two fetched records (EUR, GBP) dated 2022-12-01 come back with the
        // as-of date 2022-12-05 and nothing else changed.
        let fetched = vec![
            batch(Source::Ecb, "USD", "2022-12-01", &[("EUR", 0.9497)]),
            batch(Source::Ecb, "USD", "2022-12-01", &[("GBP", 0.8162)]),
        ];
        let importer = RatesImporter::new(
            Source::Ecb,
            "USD",
            MockProvider::returning(Ok(fetched)),
            MockStore::empty(),
            stamp("2022-12-05"),
        );

        importer.run_import().await.unwrap();

        let inserted = importer.store().inserted.lock().unwrap();
        assert_eq!(inserted.len(), 1);
        let records = &inserted[0];
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.date == date("2022-12-05")));
        assert_eq!(records[0].rate("EUR"), Some(0.9497));
        assert_eq!(records[1].rate("GBP"), Some(0.8162));
    }

    #[tokio::test]
    async fn test_no_new_data_is_recovered() {
        let importer = RatesImporter::new(
            Source::Ecb,
            "EUR",
            MockProvider::returning(Err(ProviderError::NoNewData { source: Source::Ecb })),
            MockStore::empty(),
            stamp("2022-12-05"),
        );

        importer.run_import().await.unwrap();

        assert_eq!(*importer.store().read_calls.lock().unwrap(), 1);
        let inserted = importer.store().inserted.lock().unwrap();
        assert_eq!(inserted.len(), 1);
        assert!(inserted[0].is_empty());
    }

    #[tokio::test]
    async fn test_no_new_data_with_stamp_policy_ignores_stored_rates() {
        // The legacy policy drops the stored JPY record on the floor and
        // inserts an empty list. Asserted as actual behaviour, not intent.
        let latest = vec![batch(Source::Ecb, "EUR", "2022-11-20", &[("JPY", 144.81)])];
        let importer = RatesImporter::new(
            Source::Ecb,
            "EUR",
            MockProvider::returning(Err(ProviderError::NoNewData { source: Source::Ecb })),
            MockStore::with_latest(latest),
            stamp("2022-12-05"),
        );

        importer.run_import().await.unwrap();

        let inserted = importer.store().inserted.lock().unwrap();
        assert_eq!(inserted.len(), 1);
        assert!(inserted[0].is_empty());
    }

    #[tokio::test]
    async fn test_no_new_data_with_carry_forward_fills_from_stored() {
        let latest = vec![batch(Source::Ecb, "EUR", "2022-12-03", &[("USD", 1.0531)])];
        let importer = RatesImporter::new(
            Source::Ecb,
            "EUR",
            MockProvider::returning(Err(ProviderError::NoNewData { source: Source::Ecb })),
            MockStore::with_latest(latest),
            ReconcilePolicy::CarryForward {
                as_of: date("2022-12-05"),
            },
        );

        importer.run_import().await.unwrap();

        let inserted = importer.store().inserted.lock().unwrap();
        let records = &inserted[0];
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, date("2022-12-04"));
        assert_eq!(records[1].date, date("2022-12-05"));
        assert!(records.iter().all(|r| r.rate("USD") == Some(1.0531)));
    }

    #[tokio::test]
    async fn test_hard_fetch_failure_aborts_before_any_store_call() {
        let importer = RatesImporter::new(
            Source::Ecb,
            "EUR",
            MockProvider::returning(Err(ProviderError::Http {
                source: Source::Ecb,
                message: "connection refused".into(),
            })),
            MockStore::empty(),
            stamp("2022-12-05"),
        );

        let result = importer.run_import().await;

        assert!(matches!(
            result,
            Err(ImportError::Provider(ProviderError::Http { .. }))
        ));
        assert_eq!(*importer.store().read_calls.lock().unwrap(), 0);
        assert!(importer.store().inserted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_base_currency_aborts() {
        let importer = RatesImporter::new(
            Source::Ecb,
            "USD",
            MockProvider::returning(Err(ProviderError::UnsupportedBaseCurrency {
                source: Source::Ecb,
                base_currency: "USD".into(),
            })),
            MockStore::empty(),
            stamp("2022-12-05"),
        );

        let result = importer.run_import().await;

        assert!(matches!(
            result,
            Err(ImportError::Provider(
                ProviderError::UnsupportedBaseCurrency { .. }
            ))
        ));
        assert!(importer.store().inserted.lock().unwrap().is_empty());
    }
}
