//! Command trait definition for CLI commands.
//!
//! Every fgstats subcommand implements [`Command`]; `enum_dispatch` routes the parsed
//! subcommand to its implementation without a trait object.

use anyhow::Result;
use enum_dispatch::enum_dispatch;

/// Trait implemented by all fgstats CLI commands.
///
/// The `command_line` parameter carries the full invocation so commands can log it.
#[enum_dispatch]
pub trait Command {
    #[allow(clippy::missing_errors_doc)]
    fn execute(&self, command_line: &str) -> Result<()>;
}
