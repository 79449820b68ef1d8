//! Result types for command execution

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ExecError;

/// Result of a command execution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandResult {
    /// Exit status code (0 for success)
    pub status: i32,
    /// stdout output
    pub stdout: String,
    /// stderr output
    pub stderr: String,
    /// Time taken to execute
    pub duration: Duration,
}

impl CommandResult {
    /// Build a result that exited with status 0 and printed `stdout`
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            ..Self::default()
        }
    }

    /// Check if command succeeded (exit code 0)
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// Take stdout, treating any stderr output as a failure.
    ///
    /// Parsers rely on this: anything on stderr means the output is not
    /// trustworthy even when the exit status was zero.
    ///
    /// # Errors
    /// `CommandFailed` on a non-zero status, `StderrOutput` when the status was
    /// zero but stderr is not empty.
    pub fn into_stdout(self) -> Result<String, ExecError> {
        if !self.success() {
            return Err(ExecError::CommandFailed {
                status: self.status,
                stderr: self.stderr,
            });
        }
        if !self.stderr.trim().is_empty() {
            return Err(ExecError::StderrOutput(self.stderr));
        }
        Ok(self.stdout)
    }
}
