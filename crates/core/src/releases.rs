//! Known releases for every supported system and flavour
//!
//! [`RELEASES`] is the single source of truth. The name table and the
//! display-string table are both derived from it, so they always share the
//! same `system → flavour → release` keys.

use crate::platform::SystemKind;
use indexmap::IndexMap;
use std::sync::LazyLock;

/// One known release of a flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Release {
    /// System family
    pub system: SystemKind,
    /// Flavour identifier (equals the system identifier on osx)
    pub flavour: &'static str,
    /// Release string as reported by the host
    pub release: &'static str,
    /// Codename token
    pub name: &'static str,
    /// Human-facing codename
    pub display: &'static str,
}

const fn rel(
    system: SystemKind,
    flavour: &'static str,
    release: &'static str,
    name: &'static str,
    display: &'static str,
) -> Release {
    Release {
        system,
        flavour,
        release,
        name,
        display,
    }
}

use SystemKind::{Linux, Osx};

/// Every release sysspec can name
pub static RELEASES: &[Release] = &[
    rel(Osx, "osx", "10.3", "panther", "Panther"),
    rel(Osx, "osx", "10.4", "tiger", "Tiger"),
    rel(Osx, "osx", "10.5", "leopard", "Leopard"),
    rel(Osx, "osx", "10.6", "snow_leopard", "Snow Leopard"),
    rel(Linux, "ubuntu", "4.10", "warty", "Warty Warthog"),
    rel(Linux, "ubuntu", "5.04", "hoary", "Hoary Hedgehog"),
    rel(Linux, "ubuntu", "5.10", "breezy", "Breezy Badger"),
    rel(Linux, "ubuntu", "6.06", "dapper", "Dapper Drake"),
    rel(Linux, "ubuntu", "6.10", "edgy", "Edgy Eft"),
    rel(Linux, "ubuntu", "7.04", "feisty", "Feisty Fawn"),
    rel(Linux, "ubuntu", "7.10", "gutsy", "Gutsy Gibbon"),
    rel(Linux, "ubuntu", "8.04", "hardy", "Hardy Heron"),
    rel(Linux, "ubuntu", "8.10", "intrepid", "Intrepid Ibex"),
    rel(Linux, "ubuntu", "9.04", "jaunty", "Jaunty Jackalope"),
    rel(Linux, "ubuntu", "9.10", "karmic", "Karmic Koala"),
    rel(Linux, "ubuntu", "10.04", "lucid", "Lucid Lynx"),
    rel(Linux, "debian", "5.0.4", "lenny", "Lenny"),
];

/// `system → flavour → release → value`
pub type ReleaseTable =
    IndexMap<SystemKind, IndexMap<&'static str, IndexMap<&'static str, &'static str>>>;

/// Codename tokens keyed by `system → flavour → release`
pub static NAME_TABLE: LazyLock<ReleaseTable> = LazyLock::new(|| build_table(|r| r.name));

/// Display strings keyed by `system → flavour → release`
pub static DISPLAY_TABLE: LazyLock<ReleaseTable> = LazyLock::new(|| build_table(|r| r.display));

fn build_table(value: impl Fn(&Release) -> &'static str) -> ReleaseTable {
    let mut table = ReleaseTable::new();
    for release in RELEASES {
        table
            .entry(release.system)
            .or_default()
            .entry(release.flavour)
            .or_default()
            .insert(release.release, value(release));
    }
    table
}

fn lookup(
    table: &'static ReleaseTable,
    system: SystemKind,
    flavour: &str,
    release: &str,
) -> Option<&'static str> {
    table.get(&system)?.get(flavour)?.get(release).copied()
}

/// Codename token for a release, if it is known
pub fn name_for(system: SystemKind, flavour: &str, release: &str) -> Option<&'static str> {
    lookup(&NAME_TABLE, system, flavour, release)
}

/// Display string for a release, if it is known
pub fn display_for(system: SystemKind, flavour: &str, release: &str) -> Option<&'static str> {
    lookup(&DISPLAY_TABLE, system, flavour, release)
}

/// Systems that have at least one known release
pub fn all_systems() -> impl Iterator<Item = SystemKind> {
    NAME_TABLE.keys().copied()
}

/// Flavours of every system
pub fn all_flavours() -> impl Iterator<Item = &'static str> {
    NAME_TABLE.values().flat_map(|flavours| flavours.keys().copied())
}

/// Codenames of every flavour of every system
pub fn all_names() -> impl Iterator<Item = &'static str> {
    NAME_TABLE
        .values()
        .flat_map(IndexMap::values)
        .flat_map(|releases| releases.values().copied())
}

/// Flavours known for one system
pub fn flavours_for(system: SystemKind) -> impl Iterator<Item = &'static str> {
    NAME_TABLE
        .get(&system)
        .into_iter()
        .flat_map(|flavours| flavours.keys().copied())
}

/// Codenames known for one flavour of one system
pub fn names_for(system: SystemKind, flavour: &str) -> impl Iterator<Item = &'static str> {
    NAME_TABLE
        .get(&system)
        .and_then(|flavours| flavours.get(flavour))
        .into_iter()
        .flat_map(|releases| releases.values().copied())
}

/// Whether an identifier is a system, flavour or codename sysspec knows about
pub fn is_known_token(token: &str) -> bool {
    all_systems().any(|s| s.as_str() == token)
        || all_flavours().any(|f| f == token)
        || all_names().any(|n| n == token)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use SystemKind::{Linux, Osx};

    fn keys(table: &ReleaseTable) -> Vec<(SystemKind, &'static str, &'static str)> {
        table
            .iter()
            .flat_map(|(system, flavours)| {
                flavours.iter().flat_map(move |(flavour, releases)| {
                    releases.keys().map(move |release| (*system, *flavour, *release))
                })
            })
            .collect()
    }

    #[test]
    fn test_tables_share_keys() {
        let names = keys(&NAME_TABLE);
        let displays = keys(&DISPLAY_TABLE);
        assert_eq!(names, displays);
        assert_eq!(names.len(), RELEASES.len());
    }

    #[test]
    fn test_every_key_resolves_in_both_tables() {
        for (system, flavour, release) in keys(&NAME_TABLE) {
            assert!(display_for(system, flavour, release).is_some());
        }
        for (system, flavour, release) in keys(&DISPLAY_TABLE) {
            assert!(name_for(system, flavour, release).is_some());
        }
    }

    #[test]
    fn test_lucid_lookup() {
        assert_eq!(name_for(Linux, "ubuntu", "10.04"), Some("lucid"));
        assert_eq!(display_for(Linux, "ubuntu", "10.04"), Some("Lucid Lynx"));
        assert_eq!(name_for(Osx, "osx", "10.6"), Some("snow_leopard"));
        assert_eq!(display_for(Linux, "debian", "5.0.4"), Some("Lenny"));
    }

    #[test]
    fn test_unknown_lookups() {
        assert_eq!(name_for(Linux, "ubuntu", "99.99"), None);
        assert_eq!(name_for(Linux, "gentoo", "10.04"), None);
        assert_eq!(display_for(Osx, "ubuntu", "10.04"), None);
    }

    #[test]
    fn test_token_universe() {
        let systems: Vec<_> = all_systems().collect();
        assert_eq!(systems, vec![Osx, Linux]);

        let flavours: Vec<_> = flavours_for(Linux).collect();
        assert_eq!(flavours, vec!["ubuntu", "debian"]);
        assert_eq!(flavours_for(Osx).collect::<Vec<_>>(), vec!["osx"]);

        assert!(names_for(Linux, "ubuntu").any(|n| n == "hardy"));
        assert!(!names_for(Linux, "ubuntu").any(|n| n == "lenny"));
        assert_eq!(names_for(Linux, "gentoo").count(), 0);

        assert!(all_flavours().any(|f| f == "debian"));
        assert_eq!(all_names().count(), RELEASES.len());
    }

    #[test]
    fn test_is_known_token() {
        for token in ["osx", "linux", "ubuntu", "debian", "lucid", "leopard", "lenny"] {
            assert!(is_known_token(token), "{token} should be known");
        }
        assert!(!is_known_token("gentoo"));
        assert!(!is_known_token("all"));
    }
}
