//! Settings handed in by the host collaborator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of the running binary, reported as the instrumentation scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    /// Executable name
    pub command: String,
    /// Human readable description
    pub description: String,
    /// Version string
    pub version: String,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            command: "assetscraper".to_string(),
            description: "Host asset inventory scraper".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Builder settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Build metadata
    #[serde(default)]
    pub build_info: BuildInfo,
    /// Fixed start time instead of "now" when the builder is created
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
}

impl Settings {
    /// Override the start time
    #[must_use]
    pub fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }
}
