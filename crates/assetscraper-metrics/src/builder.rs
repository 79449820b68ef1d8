//! Per-cycle metric batching

use std::mem;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::model::{AttributeSet, Metric, MetricsBatch, ResourceMetrics, Scope};
use crate::settings::Settings;

/// Accumulates the metrics of one scrape cycle into a resource-scoped batch.
///
/// The builder is reused across cycles: it remembers the largest number of
/// metrics one resource produced and presizes the next buffer accordingly.
/// It is not synchronized; one cycle owns it at a time (`&mut self`).
#[derive(Debug)]
pub struct MetricsBuilder {
    scope: Scope,
    start_time: DateTime<Utc>,
    metrics_capacity: usize,
    buffer: Vec<Metric>,
    emitted: Vec<ResourceMetrics>,
}

impl MetricsBuilder {
    /// Create a builder; the start time comes from `settings` or defaults to now
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            scope: Scope {
                name: settings.build_info.command.clone(),
                version: settings.build_info.version.clone(),
            },
            start_time: settings.start_time.unwrap_or_else(Utc::now),
            metrics_capacity: 0,
            buffer: Vec::new(),
            emitted: Vec::new(),
        }
    }

    /// Start of the current cycle
    #[must_use]
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Largest per-resource metric count seen so far
    #[must_use]
    pub fn metrics_capacity(&self) -> usize {
        self.metrics_capacity
    }

    /// Add a metric to the current resource. Metrics without data points are dropped.
    pub fn record(&mut self, metric: Metric) {
        if metric.data_points.is_empty() {
            debug!(metric = %metric.name, "dropping metric without data points");
            return;
        }
        self.buffer.push(metric);
    }

    /// Record several metrics
    pub fn record_all(&mut self, metrics: impl IntoIterator<Item = Metric>) {
        for metric in metrics {
            self.record(metric);
        }
    }

    /// Close the current resource with `resource` attributes.
    ///
    /// A resource that recorded nothing is not added to the batch.
    pub fn emit_for_resource(&mut self, resource: AttributeSet) {
        let metrics = mem::replace(&mut self.buffer, Vec::with_capacity(self.metrics_capacity));
        self.metrics_capacity = self.metrics_capacity.max(metrics.len());

        if metrics.is_empty() {
            return;
        }

        self.emitted.push(ResourceMetrics {
            resource,
            scope: self.scope.clone(),
            start_time: self.start_time,
            metrics,
        });
    }

    /// Close the current resource and hand over everything accumulated.
    ///
    /// The builder is left empty and ready for the next cycle.
    pub fn emit(&mut self, resource: AttributeSet) -> MetricsBatch {
        self.emit_for_resource(resource);
        MetricsBatch {
            resource_metrics: mem::take(&mut self.emitted),
        }
    }

    /// Begin a new cycle: new start time (`start_time` or now) and empty buffers
    pub fn reset(&mut self, start_time: Option<DateTime<Utc>>) {
        self.start_time = start_time.unwrap_or_else(Utc::now);
        self.buffer = Vec::with_capacity(self.metrics_capacity);
        self.emitted.clear();
    }
}
