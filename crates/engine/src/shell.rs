//! Host command execution for probes
//!
//! Commands are split with shell-words (so quoting works), resolved on
//! `PATH` and run with duct. Only stdout is captured; probes such as
//! `lsb_release` chatter on stderr.

use sysspec_core::{CommandRunner, Error, Result};

/// Runs probe commands on the real host
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

fn probe_error(command: &str, message: impl Into<String>) -> Error {
    Error::ProbeExecution {
        command: command.to_string(),
        message: message.into(),
    }
}

impl CommandRunner for ShellRunner {
    #[tracing::instrument(skip(self))]
    fn run(&self, command: &str) -> Result<String> {
        // Handles: sw_vers -productVersion → ["sw_vers", "-productVersion"]
        let parts = shell_words::split(command)
            .map_err(|e| probe_error(command, format!("invalid command line: {e}")))?;

        let Some((program, args)) = parts.split_first() else {
            return Err(probe_error(command, "empty command"));
        };

        let program_path = which::which(program)
            .map_err(|e| probe_error(command, format!("'{program}' not found: {e}")))?;

        tracing::debug!(program = %program_path.display(), ?args, "Running probe");

        let output = duct::cmd(program_path, args)
            .stdout_capture()
            .stderr_null()
            .unchecked()
            .run()
            .map_err(|e| probe_error(command, e.to_string()))?;

        if !output.status.success() {
            return Err(probe_error(command, format!("exited with {}", output.status)));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| probe_error(command, format!("output is not valid UTF-8: {e}")))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    fn assert_probe_error(result: Result<String>, expected: &str) {
        match result {
            Err(Error::ProbeExecution { message, .. }) => {
                assert!(message.contains(expected), "unexpected message: {message}");
            }
            other => panic!("expected probe error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_command() {
        assert_probe_error(ShellRunner.run("   "), "empty command");
    }

    #[test]
    fn test_unbalanced_quotes() {
        assert_probe_error(ShellRunner.run("echo \"unterminated"), "invalid command line");
    }

    #[test]
    fn test_missing_binary() {
        assert_probe_error(
            ShellRunner.run("definitely-not-a-real-probe-binary -a"),
            "not found",
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_stdout() {
        let output = ShellRunner.run("echo 'Release: 10.04'").unwrap();
        assert_eq!(output.trim(), "Release: 10.04");
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit() {
        assert_probe_error(ShellRunner.run("false"), "exited with");
    }
}
