//! Requirement tokens and specificity levels
//!
//! A requirement token names something a behavior applies to: the wildcard
//! `all`, a system (`linux`), a flavour (`ubuntu`) or a codename (`lucid`).
//! Which of those a token is depends on the platform it is checked against,
//! so tokens are kept as normalized identifiers and classified by the matcher.

use crate::platform::SystemKind;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A single requirement identifier
///
/// Tokens are lowercased and may be written with a leading `:`, so `":Lucid"`
/// and `"lucid"` are the same token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Token(String);

impl Token {
    /// Identifier of the token that matches every platform
    pub const WILDCARD: &'static str = "all";

    /// Create a token from a raw identifier
    pub fn new(raw: impl AsRef<str>) -> Self {
        let raw = raw.as_ref().trim();
        let raw = raw.strip_prefix(':').unwrap_or(raw);
        Self(raw.to_lowercase())
    }

    /// The wildcard token
    pub fn all() -> Self {
        Self(Self::WILDCARD.to_string())
    }

    /// Whether this is the wildcard token
    pub fn is_wildcard(&self) -> bool {
        self.0 == Self::WILDCARD
    }

    /// The normalized identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Token {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Token {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Token {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl From<SystemKind> for Token {
    fn from(system: SystemKind) -> Self {
        Self(system.as_str().to_string())
    }
}

impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Granularity at which a token failed to match
///
/// Ordered by specificity, so the most informative mismatch is the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Wrong OS family (or a token nothing recognizes)
    System,
    /// Right system, wrong distribution
    Flavour,
    /// Right distribution, wrong release
    Name,
}

impl Level {
    /// Lowercase identifier
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Flavour => "flavour",
            Self::Name => "name",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of tokens that matches when any one of them does
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementSet(Vec<Token>);

impl RequirementSet {
    /// Create an empty set (which never matches)
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokens in declaration order
    pub fn tokens(&self) -> &[Token] {
        &self.0
    }

    /// Iterate over the tokens
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.0.iter()
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set has no tokens
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the set contains the wildcard
    pub fn has_wildcard(&self) -> bool {
        self.0.iter().any(Token::is_wildcard)
    }
}

impl From<Token> for RequirementSet {
    fn from(token: Token) -> Self {
        Self(vec![token])
    }
}

impl From<&str> for RequirementSet {
    fn from(token: &str) -> Self {
        Self(vec![Token::new(token)])
    }
}

impl From<SystemKind> for RequirementSet {
    fn from(system: SystemKind) -> Self {
        Self(vec![system.into()])
    }
}

impl<T: Into<Token>> From<Vec<T>> for RequirementSet {
    fn from(tokens: Vec<T>) -> Self {
        tokens.into_iter().collect()
    }
}

impl<T: Into<Token>, const N: usize> From<[T; N]> for RequirementSet {
    fn from(tokens: [T; N]) -> Self {
        tokens.into_iter().collect()
    }
}

impl<T: Into<Token>> FromIterator<T> for RequirementSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a RequirementSet {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for RequirementSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{token}")?;
        }
        f.write_str("]")
    }
}
