//! Core behavioral traits for sysspec components
//!
//! Identity detection depends on this trait instead of a concrete shell so
//! that probes can be faked in tests and swapped by embedders.

use crate::Result;

/// Runs a host command and returns its standard output
///
/// Implementations must fail with [`crate::Error::ProbeExecution`] when the
/// command cannot be started or exits unsuccessfully. They must not retry.
///
/// # Examples
///
/// ```ignore
/// fn kernel(runner: &dyn CommandRunner) -> Result<String> {
///     runner.run("uname -s")
/// }
/// ```
pub trait CommandRunner {
    /// Run a command line and capture its stdout
    fn run(&self, command: &str) -> Result<String>;
}

impl<F> CommandRunner for F
where
    F: Fn(&str) -> Result<String>,
{
    fn run(&self, command: &str) -> Result<String> {
        self(command)
    }
}
