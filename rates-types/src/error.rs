//! Error types for the exchange-rates importer.

use crate::domain::Source;

/// Configuration errors (unsupported selection, missing settings).
///
/// Always fatal and always raised before any I/O happens.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown rate source: {0}")]
    UnknownSource(String),

    #[error("Unknown storage backend: {0}")]
    UnknownStorage(String),

    #[error("Storage backend '{0}' is not compiled into this build")]
    StorageNotEnabled(&'static str),

    #[error("Missing required setting: {0}")]
    MissingSetting(&'static str),

    #[error("Invalid setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}

/// Data-provider errors (fetching rates from an external source).
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The source has no new data. The one recoverable fetch failure: the
    /// importer continues with an empty batch instead of aborting the run.
    #[error("No new exchange rates available from {source}")]
    NoNewData { source: Source },

    #[error("HTTP request to {source} failed: {message}")]
    Http { source: Source, message: String },

    #[error("Failed to decode {source} response: {message}")]
    Decode { source: Source, message: String },

    #[error("{source} cannot serve rates for base currency {base_currency}")]
    UnsupportedBaseCurrency { source: Source, base_currency: String },
}

/// Storage errors (reading or writing persisted rates).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Failed to decode stored row: {0}")]
    Decode(String),
}

/// Top-level error for one import run.
///
/// Only `ProviderError::NoNewData` is handled inside the importer; every
/// other variant aborts the run and surfaces here.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
