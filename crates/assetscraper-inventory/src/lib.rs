//! assetscraper-inventory: installed software and update discovery
//!
//! Probes which data source works on the current host, runs it, and parses
//! the loosely structured output into normalized records.

pub mod dates;
pub mod discovery;
pub mod error;
pub mod provider;
pub mod registry;
pub mod software;
pub mod types;
pub mod updates;

pub use discovery::{CommandDiscovery, Discovery};
pub use error::InventoryError;
pub use provider::{Candidate, FallbackProvider, Provider, select_provider};
pub use types::{InstalledSoftware, InstalledUpdate};
