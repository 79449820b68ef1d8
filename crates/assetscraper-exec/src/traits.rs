//! Command executor trait

use async_trait::async_trait;

use crate::context::ExecContext;
use crate::error::ExecError;
use crate::result::CommandResult;

/// Runs an argument list through an external interpreter.
///
/// Implementations block the calling task until the process exits, the
/// context deadline passes, or the context is cancelled.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Execute `args` and capture stdout/stderr.
    ///
    /// A non-zero exit status is not an `Err` here; it is reported through
    /// [`CommandResult::status`]. Use [`CommandResult::into_stdout`] to apply
    /// the failure policy.
    ///
    /// # Errors
    /// Returns `ExecError` if the process cannot be spawned, its output cannot
    /// be read, the deadline expires, or the context is cancelled.
    async fn execute(&self, ctx: &ExecContext, args: &[String])
    -> Result<CommandResult, ExecError>;

    /// Short identifier used in logs
    fn executor_type(&self) -> &'static str;
}
