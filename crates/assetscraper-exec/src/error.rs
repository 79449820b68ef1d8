//! Error types for assetscraper-exec

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while running an external command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    /// Process could not be started
    #[error("failed to spawn process: {0}")]
    SpawnError(String),

    /// I/O error while collecting output
    #[error("I/O error: {0}")]
    IoError(String),

    /// Process exited with a non-zero status
    #[error("command execution failed: {status} - {stderr}")]
    CommandFailed {
        /// Exit status code
        status: i32,
        /// Stderr output
        stderr: String,
    },

    /// Process exited cleanly but wrote to stderr
    #[error("command wrote to stderr: {0}")]
    StderrOutput(String),

    /// Deadline expired before the process exited
    #[error("command timed out after {timeout:?}")]
    Timeout {
        /// Bound that was exceeded
        timeout: Duration,
    },

    /// Calling context was cancelled
    #[error("command cancelled")]
    Cancelled,
}

impl ExecError {
    /// Check if error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExecError::Timeout { .. } | ExecError::IoError(_))
    }
}
