//! System families sysspec can identify
//!
//! The root probe (`uname -s`) maps onto one of these:
//! - `Linux` → [`SystemKind::Linux`]
//! - `Darwin` → [`SystemKind::Osx`]
//!
//! Anything else is an unsupported system.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level OS family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemKind {
    /// Mac OS X, reported by the kernel as "Darwin"
    Osx,
    /// Any Linux distribution
    Linux,
}

impl SystemKind {
    /// Every supported system, in table order
    pub const ALL: [Self; 2] = [Self::Osx, Self::Linux];

    /// Map the output of `uname -s` onto a system family
    pub fn from_uname(uname: &str) -> Result<Self> {
        match uname.trim() {
            "Linux" => Ok(Self::Linux),
            "Darwin" => Ok(Self::Osx),
            other => Err(Error::UnsupportedSystem {
                uname: other.to_string(),
            }),
        }
    }

    /// Token identifier (`"linux"`, `"osx"`)
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Osx => "osx",
            Self::Linux => "linux",
        }
    }

    /// Human-facing name
    pub const fn display_str(self) -> &'static str {
        match self {
            Self::Osx => "Mac OS X",
            Self::Linux => "Linux",
        }
    }

    /// Parse a token identifier back into a system
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == token)
    }
}

impl fmt::Display for SystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_from_uname() {
        assert_eq!(SystemKind::from_uname("Linux").unwrap(), SystemKind::Linux);
        assert_eq!(SystemKind::from_uname("Darwin\n").unwrap(), SystemKind::Osx);
    }

    #[test]
    fn test_from_uname_unsupported() {
        let err = SystemKind::from_uname("FreeBSD").unwrap_err();
        match err {
            Error::UnsupportedSystem { uname } => assert_eq!(uname, "FreeBSD"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_token_roundtrip() {
        for system in SystemKind::ALL {
            assert_eq!(SystemKind::from_token(system.as_str()), Some(system));
        }
        assert_eq!(SystemKind::from_token("ubuntu"), None);
    }

    #[test]
    fn test_serialize_lowercase() {
        let json = serde_json::to_string(&SystemKind::Osx).unwrap();
        assert_eq!(json, "\"osx\"");
    }
}
