//! Inventory record definitions

use serde::{Deserialize, Serialize};

// ============================================================================
// Installed Software
// ============================================================================

/// One installed package or application
///
/// Every field may be empty; data sources differ in what they know.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledSoftware {
    /// Package or display name
    pub name: String,
    /// Vendor / publisher
    pub publisher: String,
    /// Installed version
    pub version: String,
    /// Install date, `YYYY-MM-DD` when known
    pub install_date: String,
}

impl InstalledSoftware {
    /// Create a record with name and version
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Set publisher
    #[must_use]
    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = publisher.into();
        self
    }

    /// Set install date
    #[must_use]
    pub fn with_install_date(mut self, date: impl Into<String>) -> Self {
        self.install_date = date.into();
        self
    }
}

// ============================================================================
// Installed Updates
// ============================================================================

/// One installed OS update (hotfix)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledUpdate {
    /// Support URL or caption
    pub caption: String,
    /// Hotfix identifier, e.g. `KB5022282`
    pub hotfix_id: String,
    /// Install date, `YYYY-M-D`
    pub installed_on: String,
    /// Account that installed the update
    pub installed_by: String,
    /// Update category, e.g. `Security Update`
    pub description: String,
}
