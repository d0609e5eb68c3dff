//! Info command implementation
//!
//! Display every identity level of the current platform.

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use sysspec_core::VersionInfo;
use sysspec_engine::{Identity, Platform, SystemSpec};
use tracing::debug;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;

const UNKNOWN: &str = "unknown";

/// Everything `info` reports
#[derive(Debug, Serialize)]
struct InfoData<'a> {
    identity: Identity,
    reported: String,
    architecture: &'static str,
    version_info: &'a VersionInfo,
}

/// Info command
#[derive(Debug, Args)]
pub struct InfoCommand {
    /// Also show the raw probe output
    #[arg(long)]
    pub all: bool,

    /// Output in JSON format (default: table format)
    #[arg(long)]
    pub json: bool,
}

impl Command for InfoCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let info = gather_info(&context.platform);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&info)?);
        } else {
            display_table(&info, self.all);
        }
        Ok(())
    }
}

fn gather_info(platform: &Platform) -> InfoData<'_> {
    debug!("Gathering platform information");

    InfoData {
        identity: platform.identity(),
        reported: get_os_name(),
        architecture: std::env::consts::ARCH,
        version_info: platform.version_info(),
    }
}

/// OS name and version as `os_info` sees it, for cross-checking the probes
fn get_os_name() -> String {
    let info = os_info::get();

    let version = info.version();
    if version == &os_info::Version::Unknown {
        info.os_type().to_string()
    } else {
        format!("{} {}", info.os_type(), version)
    }
}

/// "Display (token)", or just whichever of the two is known
fn labelled(display: Option<&str>, token: Option<&str>) -> Option<String> {
    match (display, token) {
        (Some(display), Some(token)) if display != token => Some(format!("{display} ({token})")),
        (Some(value), _) | (None, Some(value)) => Some(value.to_string()),
        (None, None) => None,
    }
}

fn display_table(info: &InfoData<'_>, all: bool) {
    let identity = &info.identity;

    print_section_header("Platform");
    print_level(
        "System",
        labelled(Some(&identity.system_str), Some(identity.system.as_str())),
    );
    print_level(
        "Flavour",
        labelled(identity.flavour_str.as_deref(), identity.flavour.as_deref()),
    );
    print_level(
        "Release",
        (!identity.release.is_empty()).then(|| identity.release.clone()),
    );
    print_level("Version", identity.version.clone());
    print_level("Name", labelled(identity.name_str, identity.name));
    println!();

    print_section_header("Host");
    print_row("Reported", &info.reported, true);
    print_row("Architecture", info.architecture, true);
    println!();

    if all {
        print_section_header("Probe output");
        if info.version_info.is_empty() {
            print_row("(empty)", "", false);
        }
        for (key, value) in info.version_info.iter() {
            print_row(key, value, true);
        }
        println!();
    }
}

fn print_section_header(name: &str) {
    println!("{}", name.bright_white().bold());
}

fn print_level(label: &str, value: Option<String>) {
    match value {
        Some(value) => print_row(label, &value, true),
        None => print_row(label, UNKNOWN, false),
    }
}

/// Print a single table row with status indicator
fn print_row(label: &str, value: &str, ok: bool) {
    let (symbol, value) = if ok {
        ("✓".bright_green().to_string(), value.bright_white().to_string())
    } else {
        ("⚠".yellow().to_string(), value.dimmed().to_string())
    };
    println!("  {symbol} {label:14} {value}");
}
