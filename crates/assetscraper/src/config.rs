//! Configuration loading and types

use std::path::{Path, PathBuf};

use assetscraper_core::ScraperConfig;
use serde::{Deserialize, Serialize};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "ASSETSCRAPER_CONFIG";

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
    /// Scraper settings
    #[serde(default)]
    pub scraper: ScraperConfig,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive (trace, debug, info, warn, error or an `EnvFilter` expression)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit logs as JSON lines
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| eyre::eyre!("failed to read {}: {e}", path.display()))?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Path of the config file to use when none was given on the command line.
    ///
    /// The environment variable wins even if the file does not exist, so a
    /// typo there is reported instead of silently using defaults.
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }

        let paths = [
            Some(PathBuf::from("assetscraper.toml")),
            Some(PathBuf::from("/etc/assetscraper/assetscraper.toml")),
            dirs::config_dir().map(|p| p.join("assetscraper/assetscraper.toml")),
        ];

        paths.into_iter().flatten().find(|path| path.exists())
    }
}
