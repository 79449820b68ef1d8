//! dpkg status listing (Debian/Ubuntu)

use std::sync::{Arc, LazyLock};

use assetscraper_exec::{CommandExecutor, ExecContext};
use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, info, instrument};

use crate::discovery::CommandDiscovery;
use crate::error::InventoryError;
use crate::provider::{Candidate, Provider};
use crate::types::InstalledSoftware;

/// Installed package line: status `ii`, then name and version columns
#[allow(clippy::expect_used)]
static INSTALLED_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ii\s+(\S+)\s+(\S+)").expect("static regex should not panic")
});

/// Lists packages with `dpkg -l`
pub struct DpkgProvider {
    executor: Arc<dyn CommandExecutor>,
}

impl DpkgProvider {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    /// Candidate gated on `dpkg --version`
    pub fn candidate(executor: Arc<dyn CommandExecutor>) -> Candidate<InstalledSoftware> {
        Candidate::new(
            CommandDiscovery::version_of(Arc::clone(&executor), "dpkg"),
            Self::new(executor),
        )
    }

    /// Parse `dpkg -l` output
    ///
    /// Header rows and packages in any state other than `ii` are skipped.
    pub(crate) fn parse_listing(output: &str) -> Vec<InstalledSoftware> {
        output
            .lines()
            .filter_map(|line| INSTALLED_LINE.captures(line))
            .map(|caps| InstalledSoftware::new(&caps[1], &caps[2]))
            .collect()
    }
}

#[async_trait]
impl Provider<InstalledSoftware> for DpkgProvider {
    #[instrument(skip(self, ctx))]
    async fn get(&self, ctx: &ExecContext) -> Result<Vec<InstalledSoftware>, InventoryError> {
        debug!("listing installed dpkg packages");

        let args = vec!["dpkg".to_string(), "-l".to_string()];
        let stdout = self.executor.execute(ctx, &args).await?.into_stdout()?;

        let packages = Self::parse_listing(&stdout);
        info!(count = packages.len(), "found installed packages");

        Ok(packages)
    }

    fn name(&self) -> &'static str {
        "dpkg"
    }
}
