//! Tokens command implementation
//!
//! List the requirement tokens sysspec understands, with the level each is
//! matched at.

use clap::Args;
use owo_colors::OwoColorize;
use sysspec_core::{Level, SystemKind, Token, releases};
use sysspec_engine::{Platform, SystemSpec};

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;

/// Tokens command
#[derive(Debug, Args)]
pub struct TokensCommand {
    /// List tokens for every system, not just the current one
    #[arg(long)]
    pub all: bool,
}

/// A token and whether the platform satisfies it
#[derive(Debug, Clone, PartialEq, Eq)]
struct TokenRow {
    level: Level,
    token: &'static str,
    matches: bool,
}

impl Command for TokensCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let rows = collect_rows(&context.platform, self.all);

        let mut level = None;
        for row in &rows {
            if level != Some(row.level) {
                level = Some(row.level);
                println!("{}", row.level.bright_white().bold());
            }
            let symbol = if row.matches {
                "✓".bright_green().to_string()
            } else {
                " ".to_string()
            };
            println!("  {symbol} {}", row.token);
        }
        Ok(())
    }
}

/// Tokens grouped by level
///
/// Without `all`, only the current system's flavours and the current
/// flavour's codenames are listed.
fn collect_rows(platform: &Platform, all: bool) -> Vec<TokenRow> {
    let system = platform.system();
    let systems: Vec<SystemKind> = if all {
        releases::all_systems().collect()
    } else {
        vec![system]
    };

    let mut rows = vec![row(platform, Level::System, Token::WILDCARD)];
    rows.extend(
        releases::all_systems().map(|s| row(platform, Level::System, s.as_str())),
    );

    for &s in &systems {
        rows.extend(releases::flavours_for(s).map(|f| row(platform, Level::Flavour, f)));
    }

    for &s in &systems {
        for flavour in releases::flavours_for(s) {
            if !all && platform.flavour() != Some(flavour) {
                continue;
            }
            rows.extend(releases::names_for(s, flavour).map(|n| row(platform, Level::Name, n)));
        }
    }
    rows
}

fn row(platform: &Platform, level: Level, token: &'static str) -> TokenRow {
    TokenRow {
        level,
        token,
        matches: platform.matches(token),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use sysspec_core::parse_kv;

    fn lucid() -> Platform {
        Platform::from_version_info(
            SystemKind::Linux,
            parse_kv("Distributor ID: Ubuntu\nRelease: 10.04\n"),
        )
    }

    fn tokens_at(rows: &[TokenRow], level: Level) -> Vec<&'static str> {
        rows.iter()
            .filter(|r| r.level == level)
            .map(|r| r.token)
            .collect()
    }

    #[test]
    fn test_current_platform_tokens() {
        let rows = collect_rows(&lucid(), false);

        assert_eq!(tokens_at(&rows, Level::System), vec!["all", "osx", "linux"]);
        assert_eq!(tokens_at(&rows, Level::Flavour), vec!["ubuntu", "debian"]);

        let names = tokens_at(&rows, Level::Name);
        assert!(names.contains(&"lucid"));
        assert!(names.contains(&"hardy"));
        assert!(!names.contains(&"lenny"));
        assert!(!names.contains(&"leopard"));
    }

    #[test]
    fn test_match_markers() {
        let rows = collect_rows(&lucid(), false);
        let matching: Vec<_> = rows.iter().filter(|r| r.matches).map(|r| r.token).collect();
        assert_eq!(matching, vec!["all", "linux", "ubuntu", "lucid"]);
    }

    #[test]
    fn test_all_lists_every_system() {
        let rows = collect_rows(&lucid(), true);
        let names = tokens_at(&rows, Level::Name);
        assert!(names.contains(&"lenny"));
        assert!(names.contains(&"snow_leopard"));
        assert_eq!(tokens_at(&rows, Level::Flavour), vec!["osx", "ubuntu", "debian"]);
        assert_eq!(names.len(), releases::RELEASES.len());
    }
}
