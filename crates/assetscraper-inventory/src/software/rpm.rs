//! rpm query listing (Fedora/RHEL/SUSE)

use std::sync::Arc;

use assetscraper_exec::{CommandExecutor, ExecContext};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::dates::epoch_seconds_to_date;
use crate::discovery::CommandDiscovery;
use crate::error::InventoryError;
use crate::provider::{Candidate, Provider};
use crate::types::InstalledSoftware;

/// Field separator used in the query format
const DELIMITER: char = ';';

/// `name;version;install-epoch-seconds`, one package per line
const QUERY_FORMAT: &str = r"'%{NAME};%{VERSION};%{INSTALLTIME}\n'";

/// Lists packages with `rpm -qa --queryformat`
pub struct RpmProvider {
    executor: Arc<dyn CommandExecutor>,
}

impl RpmProvider {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    /// Candidate gated on `rpm --version`
    pub fn candidate(executor: Arc<dyn CommandExecutor>) -> Candidate<InstalledSoftware> {
        Candidate::new(
            CommandDiscovery::version_of(Arc::clone(&executor), "rpm"),
            Self::new(executor),
        )
    }

    /// Parse delimited query output
    ///
    /// Lines with fewer than three fields are dropped. A non-numeric install
    /// time keeps the record with an empty date.
    pub(crate) fn parse_listing(output: &str) -> Vec<InstalledSoftware> {
        output
            .lines()
            .filter_map(|line| {
                let parts: Vec<&str> = line.split(DELIMITER).collect();
                if parts.len() < 3 {
                    return None;
                }
                Some(
                    InstalledSoftware::new(parts[0], parts[1])
                        .with_install_date(epoch_seconds_to_date(parts[2])),
                )
            })
            .collect()
    }
}

#[async_trait]
impl Provider<InstalledSoftware> for RpmProvider {
    #[instrument(skip(self, ctx))]
    async fn get(&self, ctx: &ExecContext) -> Result<Vec<InstalledSoftware>, InventoryError> {
        debug!("listing installed rpm packages");

        let args: Vec<String> = ["rpm", "-qa", "--queryformat", QUERY_FORMAT]
            .into_iter()
            .map(String::from)
            .collect();
        let stdout = self.executor.execute(ctx, &args).await?.into_stdout()?;

        let packages = Self::parse_listing(&stdout);
        info!(count = packages.len(), "found installed packages");

        Ok(packages)
    }

    fn name(&self) -> &'static str {
        "rpm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listing() {
        let output = "bash;5.1.8;1679356800\nopenssl-libs;3.0.7;1000000000\n";

        let packages = RpmProvider::parse_listing(output);

        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].name, "bash");
        assert_eq!(packages[0].version, "5.1.8");
        assert_eq!(packages[0].install_date, "2023-03-21");
        assert_eq!(packages[1].install_date, "2001-09-09");
    }

    #[test]
    fn test_short_lines_dropped() {
        let output = "bash;5.1.8\n\njust-a-name\nvim;9.0;1679356800";

        let packages = RpmProvider::parse_listing(output);

        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name, "vim");
    }

    #[test]
    fn test_non_numeric_time_renders_empty_date() {
        let packages = RpmProvider::parse_listing("gpg-pubkey;abc123;(none)");

        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].version, "abc123");
        assert!(packages[0].install_date.is_empty());
    }
}
