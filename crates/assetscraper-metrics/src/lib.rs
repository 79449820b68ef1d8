//! assetscraper-metrics: metric data model and batching
//!
//! A minimal, serializable rendition of a resource-scoped metric batch and
//! the builder that accumulates one batch per scrape cycle.

pub mod builder;
pub mod model;
pub mod settings;

pub use builder::MetricsBuilder;
pub use model::{AttributeSet, DataPoint, Metric, MetricsBatch, ResourceMetrics, Scope};
pub use settings::{BuildInfo, Settings};
