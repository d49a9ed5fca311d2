//! Domain models for the exchange-rates importer.

pub mod rate;
pub mod source;
pub mod storage;

pub use rate::ExchangeRate;
pub use source::Source;
pub use storage::StorageType;
