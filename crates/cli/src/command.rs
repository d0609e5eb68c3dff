//! Command trait for the sysspec CLI
//!
//! Every subcommand implements [`Command`] so it can be executed against a
//! shared [`RuntimeContext`] and tested without going through argument
//! parsing.

use crate::common::RuntimeContext;
use crate::error::Result;

/// Trait for all sysspec commands
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Debug, Args)]
/// pub struct MyCommand {
///     #[arg(long)]
///     pub json: bool,
/// }
///
/// impl Command for MyCommand {
///     type Output = ();
///
///     fn execute(&self, context: &RuntimeContext) -> Result<()> {
///         println!("{}", context.platform.system_str());
///         Ok(())
///     }
/// }
/// ```
pub trait Command {
    /// The type returned by this command
    type Output;

    /// Execute the command with the given runtime context
    ///
    /// # Errors
    ///
    /// Returns a `CommandError` if the command fails. Messages should be
    /// descriptive enough for the user to act on.
    fn execute(&self, context: &RuntimeContext) -> Result<Self::Output>;
}
