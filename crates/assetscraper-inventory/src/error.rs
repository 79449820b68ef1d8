//! Error types for assetscraper-inventory

use assetscraper_exec::ExecError;
use thiserror::Error;

/// Errors that can occur while collecting inventory
///
/// Malformed lines or rows never show up here; parsers drop them. Only the
/// failure of the command or query itself is reported.
#[derive(Error, Debug, Clone)]
pub enum InventoryError {
    /// The external command or query failed
    #[error("execution error: {0}")]
    Execution(#[from] ExecError),

    /// Enumerating one registry view failed
    #[error("registry enumeration of {root} failed: {source}")]
    Registry {
        /// Root key and view that failed
        root: String,
        /// Underlying failure
        #[source]
        source: ExecError,
    },
}

impl InventoryError {
    /// Check if error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            InventoryError::Execution(e) | InventoryError::Registry { source: e, .. } => {
                e.is_retryable()
            }
        }
    }
}
