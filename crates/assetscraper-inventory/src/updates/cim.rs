//! Windows hotfix inventory from `Win32_QuickFixEngineering`

use std::sync::Arc;

use assetscraper_exec::{CommandExecutor, ExecContext};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::dates::us_date_to_ymd;
use crate::error::InventoryError;
use crate::provider::Provider;
use crate::types::InstalledUpdate;

/// Selects the five fields as strings. `InstalledOn` is taken from the raw
/// CIM property so it keeps its `M/D/YYYY` form instead of a localized date.
/// Redirected output would otherwise use the console code page.
const QUERY: &str = "[Console]::OutputEncoding=[Text.Encoding]::UTF8; \
    Get-CimInstance -ClassName Win32_QuickFixEngineering | \
    Select-Object Caption,Description,HotFixID,InstalledBy,\
    @{Name='InstalledOn';Expression={$_.CimInstanceProperties['InstalledOn'].Value}} | \
    ConvertTo-Json -Compress";

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct QuickFixRow {
    caption: Option<String>,
    description: Option<String>,
    #[serde(rename = "HotFixID")]
    hotfix_id: Option<String>,
    installed_by: Option<String>,
    installed_on: Option<String>,
}

impl From<QuickFixRow> for InstalledUpdate {
    fn from(row: QuickFixRow) -> Self {
        Self {
            caption: row.caption.unwrap_or_default(),
            hotfix_id: row.hotfix_id.unwrap_or_default(),
            installed_on: us_date_to_ymd(row.installed_on.as_deref().unwrap_or_default()),
            installed_by: row.installed_by.unwrap_or_default(),
            description: row.description.unwrap_or_default(),
        }
    }
}

/// Queries installed hotfixes through CIM
///
/// The executor is expected to use the `PowerShell` interpreter.
pub struct CimUpdatesProvider {
    executor: Arc<dyn CommandExecutor>,
}

impl CimUpdatesProvider {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    /// Parse `ConvertTo-Json` output: a single object for one row, an array
    /// otherwise, nothing at all for zero rows.
    pub(crate) fn parse_rows(output: &str) -> Vec<InstalledUpdate> {
        let output = output.trim();
        if output.is_empty() {
            return Vec::new();
        }

        let rows = match serde_json::from_str::<Value>(output) {
            Ok(Value::Array(rows)) => rows,
            Ok(row @ Value::Object(_)) => vec![row],
            Ok(_) => {
                warn!("update query returned neither an object nor an array");
                return Vec::new();
            }
            Err(e) => {
                warn!(error = %e, "update query output is not JSON");
                return Vec::new();
            }
        };

        rows.into_iter()
            .filter_map(|row| serde_json::from_value::<QuickFixRow>(row).ok())
            .map(InstalledUpdate::from)
            .collect()
    }
}

#[async_trait]
impl Provider<InstalledUpdate> for CimUpdatesProvider {
    #[instrument(skip(self, ctx))]
    async fn get(&self, ctx: &ExecContext) -> Result<Vec<InstalledUpdate>, InventoryError> {
        debug!("querying installed updates");

        let stdout = self
            .executor
            .execute(ctx, &[QUERY.to_string()])
            .await?
            .into_stdout()?;

        let updates = Self::parse_rows(&stdout);
        info!(count = updates.len(), "found installed updates");

        Ok(updates)
    }

    fn name(&self) -> &'static str {
        "cim"
    }
}
