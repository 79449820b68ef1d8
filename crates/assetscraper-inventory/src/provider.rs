//! Provider abstraction and fallback-chain selection

use std::marker::PhantomData;
use std::sync::Arc;

use assetscraper_exec::ExecContext;
use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::discovery::Discovery;
use crate::error::InventoryError;

/// Yields normalized records for one inventory domain
#[async_trait]
pub trait Provider<T>: Send + Sync {
    /// Collect the current records.
    ///
    /// # Errors
    /// Returns `InventoryError` only when the underlying command or query
    /// fails. Output that does not parse yields fewer (possibly zero) records.
    async fn get(&self, ctx: &ExecContext) -> Result<Vec<T>, InventoryError>;

    /// Short identifier used in logs
    fn name(&self) -> &'static str;
}

/// Null-object provider used when no candidate is usable
pub struct FallbackProvider<T> {
    _record: PhantomData<fn() -> T>,
}

impl<T> FallbackProvider<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            _record: PhantomData,
        }
    }
}

impl<T> Default for FallbackProvider<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Send + 'static> Provider<T> for FallbackProvider<T> {
    async fn get(&self, _ctx: &ExecContext) -> Result<Vec<T>, InventoryError> {
        Ok(Vec::new())
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}

/// A probe paired with the provider it unlocks
pub struct Candidate<T> {
    pub discovery: Box<dyn Discovery>,
    pub provider: Arc<dyn Provider<T>>,
}

impl<T> Candidate<T> {
    pub fn new(discovery: impl Discovery + 'static, provider: impl Provider<T> + 'static) -> Self {
        Self {
            discovery: Box::new(discovery),
            provider: Arc::new(provider),
        }
    }
}

/// Pick the first candidate whose probe succeeds, in list order.
///
/// Probes run sequentially and stop at the first success. With no success
/// the [`FallbackProvider`] is returned, so a host without any supported
/// tool still scrapes cleanly.
#[instrument(skip_all, fields(candidates = candidates.len()))]
pub async fn select_provider<T: Send + 'static>(
    ctx: &ExecContext,
    candidates: Vec<Candidate<T>>,
) -> Arc<dyn Provider<T>> {
    for candidate in candidates {
        let name = candidate.provider.name();
        if candidate.discovery.discover(ctx).await {
            info!(provider = name, "selected provider");
            return candidate.provider;
        }
        debug!(provider = name, "discovery failed, trying next candidate");
    }

    info!("no candidate discovered, using fallback provider");
    Arc::new(FallbackProvider::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe(bool);

    #[async_trait]
    impl Discovery for Probe {
        async fn discover(&self, _ctx: &ExecContext) -> bool {
            self.0
        }
    }

    struct Named(&'static str);

    #[async_trait]
    impl Provider<String> for Named {
        async fn get(&self, _ctx: &ExecContext) -> Result<Vec<String>, InventoryError> {
            Ok(vec![self.0.to_string()])
        }

        fn name(&self) -> &'static str {
            self.0
        }
    }

    #[tokio::test]
    async fn test_second_candidate_selected() {
        let candidates = vec![
            Candidate::new(Probe(false), Named("first")),
            Candidate::new(Probe(true), Named("second")),
        ];

        let provider = select_provider(&ExecContext::new(), candidates).await;

        assert_eq!(provider.name(), "second");
    }

    #[tokio::test]
    async fn test_first_match_wins() {
        let candidates = vec![
            Candidate::new(Probe(true), Named("first")),
            Candidate::new(Probe(true), Named("second")),
        ];

        let provider = select_provider(&ExecContext::new(), candidates).await;

        assert_eq!(provider.name(), "first");
    }

    #[tokio::test]
    async fn test_fallback_when_nothing_discovered() {
        let candidates = vec![
            Candidate::new(Probe(false), Named("first")),
            Candidate::new(Probe(false), Named("second")),
        ];

        let provider = select_provider(&ExecContext::new(), candidates).await;

        assert_eq!(provider.name(), "fallback");
        assert!(provider.get(&ExecContext::new()).await.unwrap().is_empty());
    }
}
