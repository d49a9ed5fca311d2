//! Port traits implemented by provider and store adapters.

pub mod provider;
pub mod store;

pub use provider::RateProvider;
pub use store::RateStore;
