//! assetscraper-exec: Command execution abstraction
//!
//! Runs external commands through a shell interpreter and hands back the
//! captured output. No knowledge of what the output means lives here.

pub mod context;
pub mod error;
pub mod local;
pub mod result;
pub mod traits;

pub use context::ExecContext;
pub use error::ExecError;
pub use local::{Interpreter, ShellExecutor};
pub use result::CommandResult;
pub use traits::CommandExecutor;
