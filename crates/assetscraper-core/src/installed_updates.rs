//! `swo.asset.installedupdates`

use std::sync::Arc;

use assetscraper_inventory::{InstalledUpdate, Provider};
use assetscraper_metrics::AttributeSet;

use crate::emitter::{MetricDescriptor, MetricRecord, RecordEmitter};

pub const METRIC_NAME: &str = "swo.asset.installedupdates";

pub const ATTR_CAPTION: &str = "installedupdate.caption";
pub const ATTR_DESCRIPTION: &str = "installedupdate.description";
pub const ATTR_HOTFIX_ID: &str = "installedupdate.hotfixid";
pub const ATTR_INSTALLED_BY: &str = "installedupdate.installedby";
pub const ATTR_INSTALLED_ON: &str = "installedupdate.installedon";

pub const DESCRIPTOR: MetricDescriptor = MetricDescriptor {
    name: METRIC_NAME,
    description: "Installed updates",
    unit: "",
};

impl MetricRecord for InstalledUpdate {
    fn attributes(&self) -> AttributeSet {
        AttributeSet::new()
            .with_non_empty(ATTR_CAPTION, &self.caption)
            .with_non_empty(ATTR_DESCRIPTION, &self.description)
            .with_non_empty(ATTR_HOTFIX_ID, &self.hotfix_id)
            .with_non_empty(ATTR_INSTALLED_BY, &self.installed_by)
            .with_non_empty(ATTR_INSTALLED_ON, &self.installed_on)
    }
}

/// Emitter for installed update records
pub fn emitter(provider: Arc<dyn Provider<InstalledUpdate>>) -> RecordEmitter<InstalledUpdate> {
    RecordEmitter::new(DESCRIPTOR, provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes() {
        let record = InstalledUpdate {
            caption: String::new(),
            hotfix_id: "KB5022282".to_string(),
            installed_on: "2023-3-21".to_string(),
            installed_by: "NT AUTHORITY\\SYSTEM".to_string(),
            description: "Security Update".to_string(),
        };

        let attrs = record.attributes();

        assert_eq!(attrs.len(), 4);
        assert_eq!(attrs.get(ATTR_HOTFIX_ID), Some("KB5022282"));
        assert_eq!(attrs.get(ATTR_INSTALLED_ON), Some("2023-3-21"));
        assert!(!attrs.contains_key(ATTR_CAPTION));
    }
}
