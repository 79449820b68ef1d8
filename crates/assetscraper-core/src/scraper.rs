//! Scrape cycle: runs every emitter and batches their metrics

use std::time::Duration;

use assetscraper_exec::ExecContext;
use assetscraper_metrics::{AttributeSet, MetricsBatch, MetricsBuilder, Settings};
use tracing::{Instrument, Span, debug, error, info, info_span, warn};

use crate::emitter::Emitter;
use crate::error::{CoreError, EmitError};

/// Result of one scrape cycle
#[derive(Debug, Default)]
pub struct ScrapeReport {
    /// Metrics of every emitter that succeeded
    pub batch: MetricsBatch,
    /// One entry per emitter that failed or was skipped this cycle
    pub errors: Vec<EmitError>,
}

impl ScrapeReport {
    /// True when no emitter failed
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Owns the emitters of one host and the batch builder they share.
///
/// Cycles are serialized through `&mut self`; the builder and the emitters'
/// captured start times are never touched by two cycles at once.
pub struct AssetScraper {
    emitters: Vec<Box<dyn Emitter>>,
    builder: MetricsBuilder,
    settings: Settings,
    resource: AttributeSet,
    emit_timeout: Duration,
    span: Span,
}

impl AssetScraper {
    /// Create a scraper. Everything it logs is recorded under `span`.
    pub fn new(
        settings: Settings,
        emitters: Vec<Box<dyn Emitter>>,
        resource: AttributeSet,
        emit_timeout: Duration,
        span: Span,
    ) -> Self {
        Self {
            builder: MetricsBuilder::new(&settings),
            emitters,
            settings,
            resource,
            emit_timeout,
            span,
        }
    }

    /// Names of the configured emitters, in run order
    pub fn emitter_names(&self) -> impl Iterator<Item = &str> {
        self.emitters.iter().map(|e| e.name())
    }

    /// Initialize every emitter and start a fresh batch
    ///
    /// # Errors
    /// Returns `CoreError::StartFailed` for the first emitter that cannot be
    /// initialized.
    pub async fn start(&mut self) -> Result<(), CoreError> {
        let span = self.span.clone();
        async {
            self.builder.reset(self.settings.start_time);

            for emitter in &mut self.emitters {
                emitter.init().await?;
                debug!(emitter = emitter.name(), "emitter initialized");
            }

            info!(
                emitters = self.emitters.len(),
                start_time = %self.builder.start_time(),
                "scraper started"
            );
            Ok::<_, CoreError>(())
        }
        .instrument(span)
        .await
    }

    /// Run one cycle.
    ///
    /// Emitters run one after another, each bounded by the emit timeout. A
    /// failing emitter is logged and reported but does not affect the others.
    pub async fn scrape(&mut self, ctx: &ExecContext) -> ScrapeReport {
        let mut errors = Vec::new();

        for emitter in &self.emitters {
            if ctx.is_cancelled() {
                warn!(parent: &self.span, emitter = emitter.name(), "scrape cancelled, skipping emitter");
                errors.push(EmitError::Cancelled(emitter.name().to_string()));
                continue;
            }

            let emit_ctx = ctx.child().with_timeout(self.emit_timeout);
            let span = info_span!(parent: &self.span, "emit", emitter = emitter.name());

            match emitter.emit(&emit_ctx).instrument(span).await {
                Ok(metrics) => self.builder.record_all(metrics),
                Err(e) => {
                    error!(parent: &self.span, emitter = e.emitter(), error = %e, "emitter failed");
                    errors.push(e);
                }
            }
        }

        let batch = self.builder.emit(self.resource.clone());
        info!(
            parent: &self.span,
            metrics = batch.metric_count(),
            data_points = batch.data_point_count(),
            failed = errors.len(),
            "scrape finished"
        );

        ScrapeReport { batch, errors }
    }
}
