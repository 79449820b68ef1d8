//! Scraper configuration

use std::collections::BTreeMap;
use std::time::Duration;

use assetscraper_inventory::software::PartialFailurePolicy;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Configuration for one asset scraper instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Upper bound for a single external command, in seconds
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
    /// Upper bound for one emitter within a scrape cycle, in seconds
    #[serde(default = "default_scrape_timeout_secs")]
    pub scrape_timeout_secs: u64,
    /// Per-metric switches
    #[serde(default)]
    pub metrics: MetricsConfig,
    /// Attributes identifying the scraped resource (e.g. `host.name`)
    #[serde(default)]
    pub resource_attributes: BTreeMap<String, String>,
    /// What the registry provider does when one registry view fails
    #[serde(default)]
    pub partial_failure: PartialFailurePolicy,
}

fn default_command_timeout_secs() -> u64 {
    30
}

fn default_scrape_timeout_secs() -> u64 {
    120
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            command_timeout_secs: default_command_timeout_secs(),
            scrape_timeout_secs: default_scrape_timeout_secs(),
            metrics: MetricsConfig::default(),
            resource_attributes: BTreeMap::new(),
            partial_failure: PartialFailurePolicy::default(),
        }
    }
}

impl ScraperConfig {
    /// Check values that serde cannot
    ///
    /// # Errors
    /// Returns `CoreError::ConfigError` on a zero timeout.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.command_timeout_secs == 0 {
            return Err(CoreError::ConfigError(
                "command_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.scrape_timeout_secs == 0 {
            return Err(CoreError::ConfigError(
                "scrape_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    #[must_use]
    pub fn scrape_timeout(&self) -> Duration {
        Duration::from_secs(self.scrape_timeout_secs)
    }
}

/// Switches for the metrics the scraper can produce
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(rename = "swo.asset.installedsoftware", default)]
    pub installed_software: MetricConfig,
    #[serde(rename = "swo.asset.installedupdates", default)]
    pub installed_updates: MetricConfig,
}

/// Settings of a single metric
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Default for MetricConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScraperConfig::default();

        assert_eq!(config.command_timeout(), Duration::from_secs(30));
        assert_eq!(config.scrape_timeout(), Duration::from_secs(120));
        assert!(config.metrics.installed_software.enabled);
        assert!(config.metrics.installed_updates.enabled);
        assert_eq!(config.partial_failure, PartialFailurePolicy::Abort);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config: ScraperConfig = toml::from_str(
            r#"
            command_timeout_secs = 10
            partial_failure = "continue"

            [metrics."swo.asset.installedupdates"]
            enabled = false

            [resource_attributes]
            "host.name" = "web-1"
            "#,
        )
        .unwrap();

        assert_eq!(config.command_timeout_secs, 10);
        assert_eq!(config.scrape_timeout_secs, 120);
        assert!(config.metrics.installed_software.enabled);
        assert!(!config.metrics.installed_updates.enabled);
        assert_eq!(config.partial_failure, PartialFailurePolicy::Continue);
        assert_eq!(
            config.resource_attributes.get("host.name").map(String::as_str),
            Some("web-1")
        );
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = ScraperConfig {
            scrape_timeout_secs: 0,
            ..ScraperConfig::default()
        };

        assert!(matches!(config.validate(), Err(CoreError::ConfigError(_))));
    }
}
