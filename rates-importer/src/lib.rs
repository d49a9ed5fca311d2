//! # Rates Importer
//!
//! Orchestration core for the exchange-rates importer: runs one
//! fetch → reconcile → persist cycle through the provider and store ports.
//! Contains NO infrastructure logic - pure orchestration over the ports.

mod importer;
mod reconcile;

#[cfg(test)]
mod importer_tests;

pub use importer::RatesImporter;
pub use reconcile::ReconcilePolicy;
