//! SqliteStore adapter tests.

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;
    use rates_types::{ExchangeRate, RateStore, Source};
    use tempfile::TempDir;

    use crate::sqlite::SqliteStore;

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

    // File-backed database: pooled connections to ":memory:" would each get
    // their own empty database.
    async fn setup_store() -> (SqliteStore, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}/rates.db", dir.path().display());
        let store = SqliteStore::new(&url).await.unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn test_empty_store_returns_no_rates() {
        let (store, _dir) = setup_store().await;

        let latest = store
            .get_latest_exchange_rates(Source::Ecb, "EUR")
            .await
            .unwrap();

        assert!(latest.is_empty());
    }

    #[tokio::test]
    async fn test_insert_then_read_latest() {
        let (store, _dir) = setup_store().await;

        let rates = vec![batch(
            Source::Ecb,
            "EUR",
            "2022-12-01",
            &[("USD", 1.0531), ("GBP", 0.8604)],
        )];
        store.insert_exchange_rates(&rates).await.unwrap();

        let latest = store
            .get_latest_exchange_rates(Source::Ecb, "EUR")
            .await
            .unwrap();

        assert_eq!(latest, rates);
    }

    #[tokio::test]
    async fn test_latest_is_per_quote_currency() {
        let (store, _dir) = setup_store().await;

        store
            .insert_exchange_rates(&[
                batch(
                    Source::Ecb,
                    "EUR",
                    "2022-11-30",
                    &[("USD", 1.0419), ("JPY", 144.81)],
                ),
                // JPY not republished on the first; its latest stays 2022-11-30.
                batch(Source::Ecb, "EUR", "2022-12-01", &[("USD", 1.0531)]),
            ])
            .await
            .unwrap();

        let latest = store
            .get_latest_exchange_rates(Source::Ecb, "EUR")
            .await
            .unwrap();

        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].date, date("2022-11-30"));
        assert_eq!(latest[0].rate("JPY"), Some(144.81));
        assert_eq!(latest[0].rate("USD"), None);
        assert_eq!(latest[1].date, date("2022-12-01"));
        assert_eq!(latest[1].rate("USD"), Some(1.0531));
    }

    #[tokio::test]
    async fn test_reinsert_same_key_upserts() {
        let (store, _dir) = setup_store().await;

        store
            .insert_exchange_rates(&[batch(Source::Ecb, "EUR", "2022-12-01", &[("USD", 1.0500)])])
            .await
            .unwrap();
        store
            .insert_exchange_rates(&[batch(Source::Ecb, "EUR", "2022-12-01", &[("USD", 1.0531)])])
            .await
            .unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exchange_rates")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);

        let latest = store
            .get_latest_exchange_rates(Source::Ecb, "EUR")
            .await
            .unwrap();
        assert_eq!(latest[0].rate("USD"), Some(1.0531));
    }

    #[tokio::test]
    async fn test_sources_are_isolated() {
        let (store, _dir) = setup_store().await;

        store
            .insert_exchange_rates(&[
                batch(Source::Ecb, "EUR", "2022-12-01", &[("USD", 1.0531)]),
                batch(
                    Source::FreeCurrencyApi,
                    "EUR",
                    "2022-12-01",
                    &[("USD", 1.0528)],
                ),
            ])
            .await
            .unwrap();

        let ecb = store
            .get_latest_exchange_rates(Source::Ecb, "EUR")
            .await
            .unwrap();
        assert_eq!(ecb.len(), 1);
        assert_eq!(ecb[0].rate("USD"), Some(1.0531));

        let fca = store
            .get_latest_exchange_rates(Source::FreeCurrencyApi, "EUR")
            .await
            .unwrap();
        assert_eq!(fca[0].rate("USD"), Some(1.0528));
    }

    #[tokio::test]
    async fn test_insert_empty_batch_is_noop() {
        let (store, _dir) = setup_store().await;

        store.insert_exchange_rates(&[]).await.unwrap();

        let latest = store
            .get_latest_exchange_rates(Source::Ecb, "EUR")
            .await
            .unwrap();
        assert!(latest.is_empty());
    }
}
