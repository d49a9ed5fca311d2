//! Storage backend selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Storage backends the importer can write to.
///
/// Each variant maps to exactly one adapter; the mapping lives in the store
/// crate's `build_store` so adding a backend is a one-line registration there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageType {
    /// Google BigQuery analytical warehouse.
    BigQuery,
    /// Postgres relational database.
    Postgres,
    /// SQLite embedded database.
    Sqlite,
}

impl StorageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::BigQuery => "bigquery",
            StorageType::Postgres => "postgres",
            StorageType::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bigquery" | "bq" => Ok(StorageType::BigQuery),
            "postgres" | "postgresql" | "pg" => Ok(StorageType::Postgres),
            "sqlite" => Ok(StorageType::Sqlite),
            _ => Err(ConfigError::UnknownStorage(s.to_string())),
        }
    }
}
