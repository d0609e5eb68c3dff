//! Raw version information reported by a host probe
//!
//! Probes such as `sw_vers` and `lsb_release -a` print one `Key: Value` pair
//! per line. The dump is kept verbatim so identity levels can be derived
//! from it lazily.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Parsed `Key: Value` output of a version probe
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionInfo(IndexMap<String, String>);

impl VersionInfo {
    /// Value for a key, if the probe reported it
    pub fn val_for(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Number of reported keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the probe reported nothing usable
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the pairs in reported order
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, String> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VersionInfo {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Parse line-oriented `Key: Value` text
///
/// Each line is split at its first `:`; whitespace around key and value is
/// trimmed. Lines without a `:` or with an empty key are skipped, and a
/// repeated key keeps its last value.
///
/// # Examples
///
/// ```
/// use sysspec_core::version_info::parse_kv;
///
/// let info = parse_kv("ProductName:\tMac OS X\nProductVersion:\t10.6.2\n");
/// assert_eq!(info.val_for("ProductVersion"), Some("10.6.2"));
/// ```
pub fn parse_kv(raw: &str) -> VersionInfo {
    raw.lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_parse_lsb_release() {
        let info = parse_kv(
            "No LSB modules are available.\n\
             Distributor ID:\tUbuntu\n\
             Description:\tUbuntu 10.04 LTS\n\
             Release:\t10.04\n\
             Codename:\tlucid\n",
        );
        assert_eq!(info.val_for("Distributor ID"), Some("Ubuntu"));
        assert_eq!(info.val_for("Release"), Some("10.04"));
        assert_eq!(info.val_for("Codename"), Some("lucid"));
        assert_eq!(info.len(), 4);
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        let info = parse_kv("  Key   :   spaced value  \r\nOther:x");
        assert_eq!(info.val_for("Key"), Some("spaced value"));
        assert_eq!(info.val_for("Other"), Some("x"));
    }

    #[test]
    fn test_parse_splits_at_first_colon() {
        let info = parse_kv("BuildTime: 12:30:00");
        assert_eq!(info.val_for("BuildTime"), Some("12:30:00"));
    }

    #[test]
    fn test_parse_skips_malformed_lines() {
        let info = parse_kv("\n: orphan value\njust text\nRelease: 8.04\n");
        assert_eq!(info.len(), 1);
        assert_eq!(info.val_for("Release"), Some("8.04"));
    }

    #[test]
    fn test_parse_last_duplicate_wins() {
        let info = parse_kv("Release: 8.04\nRelease: 10.04\n");
        assert_eq!(info.val_for("Release"), Some("10.04"));
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_kv("").is_empty());
        assert_eq!(parse_kv("").val_for("Release"), None);
    }
}
