//! Local command execution using `tokio::process`

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, error, instrument, warn};

use crate::context::ExecContext;
use crate::error::ExecError;
use crate::result::CommandResult;
use crate::traits::CommandExecutor;

/// Interpreter the argument list is handed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpreter {
    /// POSIX shell: `sh -c "<args joined by spaces>"`
    Sh,
    /// Windows command shell: `cmd /C <args...>`
    Cmd,
    /// Windows PowerShell: `powershell -NoProfile -NonInteractive -Command <args...>`
    PowerShell,
}

impl Interpreter {
    /// Interpreter matching the platform this binary was built for
    #[must_use]
    pub fn native() -> Self {
        if cfg!(windows) { Self::Cmd } else { Self::Sh }
    }

    fn command(self, args: &[String]) -> Command {
        match self {
            Self::Sh => {
                let mut cmd = Command::new("sh");
                cmd.arg("-c").arg(args.join(" "));
                cmd
            }
            Self::Cmd => {
                let mut cmd = Command::new("cmd");
                cmd.arg("/C").args(args);
                cmd
            }
            Self::PowerShell => {
                let mut cmd = Command::new("powershell");
                cmd.args(["-NoProfile", "-NonInteractive", "-Command"])
                    .args(args);
                cmd
            }
        }
    }
}

impl fmt::Display for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interpreter::Sh => write!(f, "sh"),
            Interpreter::Cmd => write!(f, "cmd"),
            Interpreter::PowerShell => write!(f, "powershell"),
        }
    }
}

/// Local command executor
///
/// Executes commands on the local machine through one [`Interpreter`]. Every
/// invocation is bounded by `command_timeout` and by the caller's
/// [`ExecContext`], whichever ends first.
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    interpreter: Interpreter,
    command_timeout: Duration,
}

impl ShellExecutor {
    /// Default per-command bound
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Create a new executor for `interpreter`
    #[must_use]
    pub fn new(interpreter: Interpreter) -> Self {
        Self {
            interpreter,
            command_timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Set the per-command timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    #[must_use]
    pub fn interpreter(&self) -> Interpreter {
        self.interpreter
    }

    /// Spawn the process and wait for its output
    async fn spawn_and_wait(&self, args: &[String]) -> Result<CommandResult, ExecError> {
        let start = Instant::now();

        let child = self
            .interpreter
            .command(args)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExecError::SpawnError(e.to_string()))?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ExecError::IoError(e.to_string()))?;

        if std::str::from_utf8(&output.stdout).is_err() {
            warn!(command = ?args, "stdout is not valid UTF-8, invalid bytes replaced");
        }

        Ok(CommandResult {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration: start.elapsed(),
        })
    }
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self::new(Interpreter::native())
    }
}

#[async_trait]
impl CommandExecutor for ShellExecutor {
    #[instrument(skip(self, ctx), fields(interpreter = %self.interpreter), level = "debug")]
    async fn execute(
        &self,
        ctx: &ExecContext,
        args: &[String],
    ) -> Result<CommandResult, ExecError> {
        if ctx.is_cancelled() {
            return Err(ExecError::Cancelled);
        }

        let bound = ctx.bound(self.command_timeout);
        debug!(command = ?args, timeout = ?bound, "executing local command");

        // Dropping the pending future kills the child (kill_on_drop).
        let result = tokio::select! {
            () = ctx.cancelled() => {
                debug!(command = ?args, "command cancelled");
                return Err(ExecError::Cancelled);
            }
            res = tokio::time::timeout(bound, self.spawn_and_wait(args)) => res,
        };

        match result {
            Ok(Ok(cmd_result)) => {
                debug!(
                    command = ?args,
                    status = cmd_result.status,
                    duration = ?cmd_result.duration,
                    "command completed"
                );
                if !cmd_result.success() {
                    warn!(
                        command = ?args,
                        status = cmd_result.status,
                        stderr = %cmd_result.stderr,
                        "command failed"
                    );
                }
                Ok(cmd_result)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => {
                error!(command = ?args, timeout = ?bound, "command timed out");
                Err(ExecError::Timeout { timeout: bound })
            }
        }
    }

    fn executor_type(&self) -> &'static str {
        "local"
    }
}
