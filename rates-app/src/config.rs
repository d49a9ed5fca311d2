//! Configuration loading from environment.

use std::env;

use rates_providers::ProviderConfig;
use rates_store::StoreConfig;

/// Application configuration.
pub struct Config {
    pub database_url: Option<String>,
    pub fca_api_key: Option<String>,
    #[cfg(feature = "bigquery")]
    pub bigquery: Option<rates_store::BigQueryConfig>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Everything is optional here; whether a setting is required depends on
    /// the selected source and backend, and that check happens at provider
    /// and store resolution.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").ok();
        let fca_api_key = env::var("FCA_API_KEY").ok();

        #[cfg(feature = "bigquery")]
        let bigquery = Self::bigquery_from_env()?;

        Ok(Self {
            database_url,
            fca_api_key,
            #[cfg(feature = "bigquery")]
            bigquery,
        })
    }

    #[cfg(feature = "bigquery")]
    fn bigquery_from_env() -> anyhow::Result<Option<rates_store::BigQueryConfig>> {
        let project_id = env::var("BIGQUERY_PROJECT_ID").ok();
        let dataset = env::var("BIGQUERY_DATASET").ok();
        let table = env::var("BIGQUERY_TABLE").ok();
        let access_token = env::var("BIGQUERY_ACCESS_TOKEN").ok();

        match (project_id, dataset, table, access_token) {
            (None, None, None, None) => Ok(None),
            (Some(project_id), Some(dataset), Some(table), Some(access_token)) => {
                Ok(Some(rates_store::BigQueryConfig {
                    project_id,
                    dataset,
                    table,
                    access_token,
                    api_base: env::var("BIGQUERY_API_BASE").ok(),
                }))
            }
            _ => anyhow::bail!(
                "incomplete BigQuery settings: set BIGQUERY_PROJECT_ID, BIGQUERY_DATASET, \
                 BIGQUERY_TABLE and BIGQUERY_ACCESS_TOKEN together"
            ),
        }
    }

    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            fca_api_key: self.fca_api_key.clone(),
            ..Default::default()
        }
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            database_url: self.database_url.clone(),
            #[cfg(feature = "bigquery")]
            bigquery: self.bigquery.clone(),
            ..Default::default()
        }
    }
}
