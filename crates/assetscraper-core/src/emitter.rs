//! Emitter contract and the generic record emitter

use std::sync::Arc;

use assetscraper_exec::ExecContext;
use assetscraper_inventory::Provider;
use assetscraper_metrics::{AttributeSet, DataPoint, Metric};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, error, instrument};

use crate::error::EmitError;

/// Adapts one data source into metrics, once per scrape cycle.
///
/// The host serializes cycles per emitter: `init` takes `&mut self`, and no
/// two `emit` calls of one emitter are expected to overlap. If cycles ever
/// overlap, the captured start time has to move into per-cycle state.
#[async_trait]
pub trait Emitter: Send + Sync {
    /// Capture the start timestamp used by subsequent data points
    ///
    /// # Errors
    /// Returns `EmitError` if the emitter cannot be prepared.
    async fn init(&mut self) -> Result<(), EmitError>;

    /// Produce this cycle's metrics.
    ///
    /// An empty vector means there was nothing to report and is not a failure.
    ///
    /// # Errors
    /// Returns `EmitError` if the data source failed; no partial metric is
    /// produced in that case.
    async fn emit(&self, ctx: &ExecContext) -> Result<Vec<Metric>, EmitError>;

    /// Name used in logs and errors
    fn name(&self) -> &str;
}

/// Static identity of an emitted metric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub unit: &'static str,
}

/// A record that can be reported as a data point
pub trait MetricRecord: Send + Sync + 'static {
    /// Sparse attribute set: only non-empty fields are present
    fn attributes(&self) -> AttributeSet;
}

/// Emits one metric with one zero-valued data point per provider record.
///
/// The value carries no quantity; each point exists to carry the identifying
/// attributes of one record.
pub struct RecordEmitter<T> {
    descriptor: MetricDescriptor,
    provider: Arc<dyn Provider<T>>,
    start_time: Option<DateTime<Utc>>,
}

impl<T: MetricRecord> RecordEmitter<T> {
    pub fn new(descriptor: MetricDescriptor, provider: Arc<dyn Provider<T>>) -> Self {
        Self {
            descriptor,
            provider,
            start_time: None,
        }
    }

    /// Captured start time, once initialized
    #[must_use]
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    /// Name of the wrapped provider
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    fn build_metric(&self, records: &[T], start: DateTime<Utc>) -> Metric {
        let now = Utc::now();
        let mut metric = Metric::with_capacity(
            self.descriptor.name,
            self.descriptor.description,
            self.descriptor.unit,
            records.len(),
        );
        metric
            .data_points
            .extend(records.iter().map(|record| DataPoint {
                start_timestamp: start,
                timestamp: now,
                int_value: 0,
                attributes: record.attributes(),
            }));
        metric
    }
}

#[async_trait]
impl<T: MetricRecord> Emitter for RecordEmitter<T> {
    async fn init(&mut self) -> Result<(), EmitError> {
        self.start_time = Some(Utc::now());
        Ok(())
    }

    #[instrument(skip(self, ctx), fields(emitter = self.descriptor.name, provider = self.provider.name()))]
    async fn emit(&self, ctx: &ExecContext) -> Result<Vec<Metric>, EmitError> {
        let start = self
            .start_time
            .ok_or_else(|| EmitError::NotInitialized(self.descriptor.name.to_string()))?;

        let records = match self.provider.get(ctx).await {
            Ok(records) => records,
            Err(e) => {
                error!(error = %e, "failed to collect records");
                return Err(EmitError::Provider {
                    emitter: self.descriptor.name.to_string(),
                    source: e,
                });
            }
        };

        if records.is_empty() {
            debug!("no records, nothing to emit");
            return Ok(Vec::new());
        }

        debug!(count = records.len(), "emitting data points");
        Ok(vec![self.build_metric(&records, start)])
    }

    fn name(&self) -> &str {
        self.descriptor.name
    }
}
