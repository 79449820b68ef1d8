//! macOS application inventory via `system_profiler`

use std::sync::Arc;

use assetscraper_exec::{CommandExecutor, ExecContext};
use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::error::InventoryError;
use crate::provider::Provider;
use crate::types::InstalledSoftware;

const DATA_TYPE: &str = "SPApplicationsDataType";

#[derive(Deserialize)]
struct ApplicationRow {
    #[serde(rename = "_name")]
    name: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    obtained_from: String,
    #[serde(default, rename = "lastModified")]
    last_modified: String,
}

/// Lists applications known to `system_profiler SPApplicationsDataType -json`
pub struct SystemProfilerProvider {
    executor: Arc<dyn CommandExecutor>,
}

impl SystemProfilerProvider {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    /// Parse the JSON report. Entries without a name are skipped; a document
    /// that is not the expected shape yields nothing.
    pub(crate) fn parse_report(output: &str) -> Vec<InstalledSoftware> {
        let report: Value = match serde_json::from_str(output) {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "system_profiler output is not JSON");
                return Vec::new();
            }
        };

        let Some(rows) = report.get(DATA_TYPE).and_then(Value::as_array) else {
            warn!("system_profiler report has no application list");
            return Vec::new();
        };

        rows.iter()
            .filter_map(|row| serde_json::from_value::<ApplicationRow>(row.clone()).ok())
            .filter(|row| !row.name.is_empty())
            .map(|row| {
                let date = DateTime::parse_from_rfc3339(&row.last_modified)
                    .map(|dt| dt.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                InstalledSoftware::new(row.name, row.version)
                    .with_publisher(row.obtained_from)
                    .with_install_date(date)
            })
            .collect()
    }
}

#[async_trait]
impl Provider<InstalledSoftware> for SystemProfilerProvider {
    #[instrument(skip(self, ctx))]
    async fn get(&self, ctx: &ExecContext) -> Result<Vec<InstalledSoftware>, InventoryError> {
        debug!("listing applications");

        let args: Vec<String> = ["system_profiler", DATA_TYPE, "-json"]
            .into_iter()
            .map(String::from)
            .collect();
        let stdout = self.executor.execute(ctx, &args).await?.into_stdout()?;

        let software = Self::parse_report(&stdout);
        info!(count = software.len(), "found installed applications");

        Ok(software)
    }

    fn name(&self) -> &'static str {
        "system_profiler"
    }
}
