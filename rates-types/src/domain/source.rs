//! External origins of rate data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// External sources the importer can pull rates from.
///
/// The `Display` form is the identifier persisted alongside every rate row,
/// so changing it is a storage-format change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Source {
    /// European Central Bank reference rates (SDMX data portal).
    Ecb,
    /// freecurrencyapi.com commercial API.
    FreeCurrencyApi,
}

impl Source {
    /// Returns the stable identifier used in storage and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Ecb => "ECB",
            Source::FreeCurrencyApi => "FCA",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Required because thiserror treats `ProviderError` fields named `source` as
// the error cause, which must implement `std::error::Error`.
impl std::error::Error for Source {}

impl FromStr for Source {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ECB" => Ok(Source::Ecb),
            "FCA" | "FCAPI" | "FREECURRENCYAPI" => Ok(Source::FreeCurrencyApi),
            _ => Err(ConfigError::UnknownSource(s.to_string())),
        }
    }
}
