//! # Rates Application
//!
//! Binary that wires together all the components:
//! - Parse the run parameters (source, storage, base currency, policy)
//! - Load remaining settings from the environment
//! - Resolve the data provider and storage adapters
//! - Run one import cycle

mod config;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rates_importer::{RatesImporter, ReconcilePolicy};
use rates_providers::build_provider;
use rates_store::build_store;
use rates_types::{Source, StorageType};

#[derive(Parser)]
#[command(name = "rates-import")]
#[command(author, version, about = "Import exchange rates into a storage backend", long_about = None)]
struct Cli {
    /// Rate source (ECB, FCA)
    #[arg(long, env = "RATES_SOURCE", default_value = "ECB")]
    source: String,

    /// Storage backend (sqlite, postgres, bigquery)
    #[arg(long, env = "RATES_STORAGE", default_value = "sqlite")]
    storage: String,

    /// Base currency the imported rates are expressed against
    #[arg(long, env = "RATES_BASE_CURRENCY", default_value = "EUR")]
    base_currency: String,

    /// As-of date for reconciliation (defaults to today, UTC)
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Reconcile policy: stamp-as-of (legacy) or carry-forward
    #[arg(long, env = "RATES_POLICY", default_value = "stamp-as-of")]
    policy: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,rates_app=debug,rates_importer=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Resolve the enumerated configuration before touching any I/O.
    let source: Source = cli.source.parse()?;
    let storage_type: StorageType = cli.storage.parse()?;
    let as_of = cli.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let policy = match cli.policy.as_str() {
        "stamp-as-of" | "stamp" => ReconcilePolicy::StampAsOf { as_of },
        "carry-forward" => ReconcilePolicy::CarryForward { as_of },
        other => anyhow::bail!("unknown reconcile policy: {other}"),
    };

    let config = config::Config::from_env()?;

    tracing::info!(
        %source,
        storage = %storage_type,
        base_currency = %cli.base_currency,
        %as_of,
        "starting import run"
    );

    let provider = build_provider(source, &config.provider_config())?;
    let store = build_store(storage_type, &config.store_config()).await?;

    let importer = RatesImporter::new(source, cli.base_currency, provider, store, policy);
    importer.run_import().await?;

    tracing::info!("import run finished");
    Ok(())
}
