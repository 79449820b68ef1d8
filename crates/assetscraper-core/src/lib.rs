//! assetscraper-core: emitters and the scrape cycle
//!
//! Wraps inventory providers in emitters that turn records into metrics, and
//! runs all emitters of one host into a single resource-scoped batch.

pub mod config;
pub mod emitter;
pub mod error;
pub mod factory;
pub mod installed_software;
pub mod installed_updates;
pub mod scraper;

pub use config::{MetricConfig, MetricsConfig, ScraperConfig};
pub use emitter::{Emitter, MetricDescriptor, MetricRecord, RecordEmitter};
pub use error::{CoreError, EmitError};
pub use factory::{Executors, Platform, build_scraper, build_scraper_for};
pub use scraper::{AssetScraper, ScrapeReport};
