//! `swo.asset.installedsoftware`

use std::sync::Arc;

use assetscraper_inventory::{InstalledSoftware, Provider};
use assetscraper_metrics::AttributeSet;

use crate::emitter::{MetricDescriptor, MetricRecord, RecordEmitter};

pub const METRIC_NAME: &str = "swo.asset.installedsoftware";

pub const ATTR_NAME: &str = "installedsoftware.name";
pub const ATTR_PUBLISHER: &str = "installedsoftware.publisher";
pub const ATTR_VERSION: &str = "installedsoftware.version";
pub const ATTR_DATE: &str = "installedsoftware.date";

pub const DESCRIPTOR: MetricDescriptor = MetricDescriptor {
    name: METRIC_NAME,
    description: "Installed software",
    unit: "",
};

impl MetricRecord for InstalledSoftware {
    fn attributes(&self) -> AttributeSet {
        AttributeSet::new()
            .with_non_empty(ATTR_NAME, &self.name)
            .with_non_empty(ATTR_PUBLISHER, &self.publisher)
            .with_non_empty(ATTR_VERSION, &self.version)
            .with_non_empty(ATTR_DATE, &self.install_date)
    }
}

/// Emitter for installed software records
pub fn emitter(provider: Arc<dyn Provider<InstalledSoftware>>) -> RecordEmitter<InstalledSoftware> {
    RecordEmitter::new(DESCRIPTOR, provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_are_sparse() {
        let record = InstalledSoftware::new("bash", "5.1-6ubuntu1");

        let attrs = record.attributes();

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get(ATTR_NAME), Some("bash"));
        assert_eq!(attrs.get(ATTR_VERSION), Some("5.1-6ubuntu1"));
        assert!(!attrs.contains_key(ATTR_PUBLISHER));
        assert!(!attrs.contains_key(ATTR_DATE));
    }

    #[test]
    fn test_all_attributes() {
        let record = InstalledSoftware::new("7-Zip", "22.01")
            .with_publisher("Igor Pavlov")
            .with_install_date("2023-03-21");

        let attrs = record.attributes();

        assert_eq!(attrs.len(), 4);
        assert_eq!(attrs.get(ATTR_DATE), Some("2023-03-21"));
    }
}
