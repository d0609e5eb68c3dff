//! Check command implementation
//!
//! Match requirement tokens against the current platform.

use clap::Args;
use owo_colors::OwoColorize;
use sysspec_core::{RequirementSet, Token};
use tracing::debug;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::{CommandError, Result};

/// Check command
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Requirement tokens; the check passes if any of them matches
    #[arg(required = true, value_name = "TOKEN")]
    pub tokens: Vec<String>,
}

impl CheckCommand {
    fn requirements(&self) -> RequirementSet {
        self.tokens.iter().map(Token::new).collect()
    }
}

impl Command for CheckCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let requirements = self.requirements();
        debug!(%requirements, "Checking requirements");

        let matcher = context.platform.matcher();
        if matcher.matches(&requirements) {
            println!("{} {requirements} matches", "✓".bright_green());
            return Ok(());
        }

        let reason = matcher.explain(&requirements).map_or_else(
            || "no platforms are allowed".to_string(),
            |mismatch| mismatch.to_string(),
        );
        Err(CommandError::RequirementsNotMet {
            requirements,
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use sysspec_config::Config;
    use sysspec_core::{SystemKind, parse_kv};
    use sysspec_engine::Platform;

    fn hardy_context() -> RuntimeContext {
        RuntimeContext::new(
            Config::default(),
            Platform::from_version_info(
                SystemKind::Linux,
                parse_kv("Distributor ID: Ubuntu\nRelease: 8.04\n"),
            ),
        )
    }

    fn check(tokens: &[&str]) -> CheckCommand {
        CheckCommand {
            tokens: tokens.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_tokens_are_normalised() {
        let requirements = check(&[":Ubuntu", " lucid "]).requirements();
        assert_eq!(requirements.to_string(), "[ubuntu, lucid]");
    }

    #[test]
    fn test_matching_requirements() {
        let context = hardy_context();
        check(&["osx", "hardy"]).execute(&context).unwrap();
        check(&["all"]).execute(&context).unwrap();
    }

    #[test]
    fn test_mismatch_explains_most_specific_level() {
        let context = hardy_context();
        let err = check(&["osx", "lucid"]).execute(&context).unwrap_err();
        match err {
            CommandError::RequirementsNotMet { reason, .. } => {
                assert_eq!(reason, "you're on Hardy Heron, not lucid");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unrecognised_token_mismatch() {
        let context = hardy_context();
        let err = check(&["gentoo"]).execute(&context).unwrap_err();
        assert!(err.to_string().contains("you're on Linux, not gentoo"));
    }
}
