//! Core error types for assetscraper-core

use assetscraper_inventory::InventoryError;
use thiserror::Error;

/// Failure of one emitter in one cycle
#[derive(Error, Debug, Clone)]
pub enum EmitError {
    /// `emit` was called before `init`
    #[error("emitter {0} was not initialized")]
    NotInitialized(String),

    /// The cycle was cancelled before the emitter ran
    #[error("emitter {0} skipped, scrape was cancelled")]
    Cancelled(String),

    /// The wrapped provider failed; no metric was produced
    #[error("emitter {emitter} failed to collect records: {source}")]
    Provider {
        /// Emitter name
        emitter: String,
        /// Provider failure
        #[source]
        source: InventoryError,
    },
}

impl EmitError {
    /// Name of the emitter that failed
    #[must_use]
    pub fn emitter(&self) -> &str {
        match self {
            EmitError::NotInitialized(name)
            | EmitError::Cancelled(name)
            | EmitError::Provider { emitter: name, .. } => name,
        }
    }
}

/// Errors that can occur while setting up or starting the scraper
#[derive(Error, Debug, Clone)]
pub enum CoreError {
    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// An emitter could not be initialized
    #[error("failed to start emitter: {0}")]
    StartFailed(#[from] EmitError),
}
