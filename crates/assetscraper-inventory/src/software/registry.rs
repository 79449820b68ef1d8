//! Windows uninstall registry

use std::sync::Arc;

use assetscraper_exec::ExecContext;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::dates::compact_date_to_iso;
use crate::error::InventoryError;
use crate::provider::Provider;
use crate::registry::{RegistryKey, RegistryReader, RegistryView};
use crate::types::InstalledSoftware;

/// Root holding one subkey per installed application
pub const UNINSTALL_ROOT: &str =
    r"HKEY_LOCAL_MACHINE\SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall";

/// Views read, in order
const VIEWS: [RegistryView; 2] = [RegistryView::Bits64, RegistryView::Bits32];

/// What to do when one registry view fails after another succeeded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialFailurePolicy {
    /// Discard everything collected so far and report the error
    #[default]
    Abort,
    /// Log a warning and keep what the other views returned; errors only when
    /// every view failed
    Continue,
}

/// Reads installed applications from the uninstall keys of both registry views
pub struct RegistryProvider {
    reader: Arc<dyn RegistryReader>,
    policy: PartialFailurePolicy,
}

impl RegistryProvider {
    pub fn new(reader: Arc<dyn RegistryReader>) -> Self {
        Self {
            reader,
            policy: PartialFailurePolicy::default(),
        }
    }

    /// Set partial failure policy
    #[must_use]
    pub fn with_policy(mut self, policy: PartialFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Convert one uninstall subkey; entries without a display name are not applications
    pub(crate) fn parse_key(key: &RegistryKey) -> Option<InstalledSoftware> {
        let name = key.value("DisplayName");
        if name.is_empty() {
            return None;
        }
        Some(
            InstalledSoftware::new(name, key.value("DisplayVersion"))
                .with_publisher(key.value("Publisher"))
                .with_install_date(compact_date_to_iso(key.value("InstallDate"))),
        )
    }
}

#[async_trait]
impl Provider<InstalledSoftware> for RegistryProvider {
    #[instrument(skip(self, ctx), fields(policy = ?self.policy))]
    async fn get(&self, ctx: &ExecContext) -> Result<Vec<InstalledSoftware>, InventoryError> {
        debug!("enumerating uninstall registry");

        let mut software = Vec::new();
        let mut succeeded = 0usize;
        let mut last_error = None;

        for view in VIEWS {
            match self.reader.subkeys(ctx, UNINSTALL_ROOT, view).await {
                Ok(keys) => {
                    succeeded += 1;
                    software.extend(keys.iter().filter_map(Self::parse_key));
                }
                Err(source) => {
                    let err = InventoryError::Registry {
                        root: format!("{UNINSTALL_ROOT} ({view})"),
                        source,
                    };
                    if self.policy == PartialFailurePolicy::Abort {
                        return Err(err);
                    }
                    warn!(error = %err, "registry view failed, continuing with remaining views");
                    last_error = Some(err);
                }
            }
        }

        if succeeded == 0
            && let Some(err) = last_error
        {
            return Err(err);
        }

        info!(count = software.len(), "found installed applications");

        Ok(software)
    }

    fn name(&self) -> &'static str {
        "registry"
    }
}
