//! sysspec CLI library
//!
//! Argument parsing and command dispatch for the `sysspec` binary, kept in a
//! library so commands can be tested without spawning the binary.

pub mod cmd;
pub mod command;
pub mod common;
pub mod error;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use sysspec_config::{Config, logging};

use command::Command;
use common::RuntimeContext;

/// sysspec - identify the host platform and check requirements against it
#[derive(Debug, Parser)]
#[command(name = "sysspec")]
#[command(about = "Identify the host platform and match requirement tokens against it")]
#[command(version)]
#[command(long_about = "Identify the host platform and match requirement tokens against it

The platform is identified at three levels: system (linux, osx), flavour
(ubuntu, debian) and codename (lucid, snow_leopard). A requirement is a set
of tokens from any level; it matches when any one token does, and `all`
matches everywhere.

Examples:
  • sysspec info
      → Show the detected system, flavour, release and codename

  • sysspec check ubuntu osx
      → Succeed on any Ubuntu or Mac OS X host

  • sysspec check lucid
      → On Hardy: \"you're on Hardy Heron, not lucid\" (exit status 1)")]
pub struct Cli {
    /// Path to the config file
    #[arg(long, env = "SYSSPEC_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (shows DEBUG level logs)
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs to a file (overrides `log.file` in the config)
    #[arg(long, env = "SYSSPEC_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the sysspec CLI
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Display the detected platform identity
    Info(cmd::info::InfoCommand),

    /// Check whether any of the given tokens matches this platform
    Check(cmd::check::CheckCommand),

    /// List known requirement tokens and which ones match
    Tokens(cmd::tokens::TokensCommand),
}

/// Main entry point for the CLI
///
/// # Errors
///
/// Returns an error if configuration or detection fails, or if the command
/// itself fails (including a `check` that doesn't match).
pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    let log_file = cli.log_file.as_deref().or(config.log.file.as_deref());
    logging::init(cli.verbose, &config.log.level, log_file)
        .context("Failed to initialize logging")?;

    let platform =
        sysspec_engine::current_with(&config.probe).context("Failed to detect platform")?;
    let context = RuntimeContext::new(config, platform.clone());

    execute_command(&cli.command, &context)
}

fn execute_command(command: &Commands, context: &RuntimeContext) -> Result<()> {
    match command {
        Commands::Info(info_cmd) => info_cmd.execute(context)?,
        Commands::Check(check_cmd) => check_cmd.execute(context)?,
        Commands::Tokens(tokens_cmd) => tokens_cmd.execute(context)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from(["sysspec", "-v", "check", "ubuntu", ":osx"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Check(check) => assert_eq!(check.tokens, vec!["ubuntu", ":osx"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_check_requires_a_token() {
        assert!(Cli::try_parse_from(["sysspec", "check"]).is_err());
    }

    #[test]
    fn test_parse_info_flags() {
        let cli = Cli::try_parse_from(["sysspec", "--config", "/tmp/sysspec.toml", "info", "--json"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/sysspec.toml")));
        assert!(matches!(cli.command, Commands::Info(ref info) if info.json && !info.all));
    }

    #[test]
    fn test_run_rejects_invalid_config() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[probe]\nunknown_key = \"x\"\n").unwrap();

        let args: [&std::ffi::OsStr; 4] = [
            "sysspec".as_ref(),
            "--config".as_ref(),
            path.as_os_str(),
            "tokens".as_ref(),
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let err = run(cli).unwrap_err();
        assert!(format!("{err:#}").starts_with("Failed to load configuration"));
    }

    #[test]
    fn test_execute_with_fixed_platform() {
        use sysspec_core::{SystemKind, parse_kv};
        use sysspec_engine::Platform;

        let context = RuntimeContext::new(
            Config::default(),
            Platform::from_version_info(SystemKind::Osx, parse_kv("ProductVersion: 10.5.8\n")),
        );
        let check = Cli::try_parse_from(["sysspec", "check", "leopard"]).unwrap();
        execute_command(&check.command, &context).unwrap();

        let mismatch = Cli::try_parse_from(["sysspec", "check", "linux"]).unwrap();
        let err = execute_command(&mismatch.command, &context).unwrap_err();
        assert!(format!("{err:#}").contains("you're on Mac OS X, not linux"));
    }
}
