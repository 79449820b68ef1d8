//! Capability probes deciding whether a data source is usable on this host

use std::sync::Arc;

use assetscraper_exec::{CommandExecutor, ExecContext};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Zero-argument capability check
#[async_trait]
pub trait Discovery: Send + Sync {
    /// `true` if the paired provider can run here
    async fn discover(&self, ctx: &ExecContext) -> bool;
}

/// Probe that runs a lightweight command, usually `<tool> --version`.
///
/// Succeeds iff the command ran and exited with status 0. Output, including
/// stderr, is ignored.
pub struct CommandDiscovery {
    executor: Arc<dyn CommandExecutor>,
    args: Vec<String>,
}

impl CommandDiscovery {
    /// Create a probe running `args`
    pub fn new<I, S>(executor: Arc<dyn CommandExecutor>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            executor,
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Probe for `<tool> --version`
    pub fn version_of(executor: Arc<dyn CommandExecutor>, tool: &str) -> Self {
        Self::new(executor, [tool, "--version"])
    }
}

#[async_trait]
impl Discovery for CommandDiscovery {
    #[instrument(skip(self, ctx), fields(probe = ?self.args), level = "debug")]
    async fn discover(&self, ctx: &ExecContext) -> bool {
        match self.executor.execute(ctx, &self.args).await {
            Ok(result) => {
                debug!(status = result.status, "probe finished");
                result.success()
            }
            Err(e) => {
                debug!(error = %e, "probe failed to run");
                false
            }
        }
    }
}
