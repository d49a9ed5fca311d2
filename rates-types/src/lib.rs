//! # Rates Types
//!
//! Domain types and port traits for the exchange-rates importer.
//! This crate has ZERO external IO dependencies - only data structures
//! and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (ExchangeRate, Source, StorageType)
//! - `ports/` - Trait definitions that provider and store adapters implement
//! - `error/` - Configuration, provider, store and import error types

pub mod domain;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{ExchangeRate, Source, StorageType};
pub use error::{ConfigError, ImportError, ProviderError, StoreError};
pub use ports::{RateProvider, RateStore};
