//! Requirement matching against a platform identity
//!
//! A token is classified by the most specific level the current platform
//! knows it at:
//! 1. `all` always matches
//! 2. a system identifier matches the current system
//! 3. a flavour of the current system matches the current flavour
//! 4. a codename of the current flavour matches the current name
//! 5. anything else is a system-level mismatch
//!
//! A requirement set matches when any of its tokens does. The most specific
//! mismatch level is the most useful thing to tell the user: "you're on Hardy
//! Heron" beats "you're on Linux".

use crate::identity::SystemSpec;
use serde::Serialize;
use std::fmt;
use sysspec_core::{Level, RequirementSet, Token, releases};
use tracing::trace;

/// Pure matcher over an immutable platform identity
#[derive(Clone, Copy)]
pub struct Matcher<'a> {
    spec: &'a dyn SystemSpec,
}

impl fmt::Debug for Matcher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("system", &self.spec.system())
            .field("flavour", &self.spec.flavour())
            .field("release", &self.spec.release())
            .finish()
    }
}

impl<'a> Matcher<'a> {
    /// Bind a matcher to a platform identity
    pub fn new(spec: &'a dyn SystemSpec) -> Self {
        Self { spec }
    }

    /// Whether at least one token matches; an empty set never does
    pub fn matches(&self, requirements: &RequirementSet) -> bool {
        requirements
            .iter()
            .any(|token| self.first_nonmatch_for(token).is_none())
    }

    /// Level at which a single token fails to match, or `None` if it matches
    pub fn first_nonmatch_for(&self, token: &Token) -> Option<Level> {
        let system = self.spec.system();
        let flavour = self.spec.flavour();

        if token.is_wildcard() {
            None
        } else if releases::all_systems().any(|s| *token == s.as_str()) {
            (*token != system.as_str()).then_some(Level::System)
        } else if releases::flavours_for(system).any(|f| *token == f) {
            (flavour != Some(token.as_str())).then_some(Level::Flavour)
        } else if flavour.is_some_and(|f| releases::names_for(system, f).any(|n| *token == n)) {
            (self.spec.name() != Some(token.as_str())).then_some(Level::Name)
        } else {
            if releases::is_known_token(token.as_str()) {
                trace!(%token, %system, "Token belongs to another platform");
            } else {
                trace!(%token, "Token not recognised");
            }
            Some(Level::System)
        }
    }

    /// Display value of the most specific token mismatch
    ///
    /// Matching tokens are skipped, not short-circuited, so `[ubuntu, lucid]`
    /// on Hardy still reports "Hardy Heron". Only the wildcard short-circuits.
    /// `None` when no token mismatches, or when the platform's own value at
    /// that level is unknown.
    pub fn differentiator_for(&self, requirements: &RequirementSet) -> Option<&'a str> {
        let level = self.most_specific_mismatch(requirements)?.0;
        self.spec.str_for(level)
    }

    /// Why the requirements don't match, or `None` if they do
    pub fn explain(&self, requirements: &RequirementSet) -> Option<Mismatch> {
        if self.matches(requirements) {
            return None;
        }
        let (level, wanted) = self.most_specific_mismatch(requirements)?;
        let current = self
            .spec
            .str_for(level)
            .map_or_else(|| format!("an unrecognised {level}"), str::to_string);

        Some(Mismatch {
            level,
            current,
            wanted,
        })
    }

    fn most_specific_mismatch(&self, requirements: &RequirementSet) -> Option<(Level, Vec<Token>)> {
        if requirements.has_wildcard() {
            return None;
        }

        let mismatches: Vec<(Level, &Token)> = requirements
            .iter()
            .filter_map(|token| self.first_nonmatch_for(token).map(|level| (level, token)))
            .collect();

        let level = mismatches.iter().map(|(level, _)| *level).max()?;
        let wanted = mismatches
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, token)| token.clone())
            .collect();

        trace!(%level, %requirements, "Most specific mismatch");
        Some((level, wanted))
    }
}

/// Why a requirement set doesn't match the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    /// Most specific level that failed
    pub level: Level,
    /// The platform's display value at that level
    pub current: String,
    /// Tokens that failed at that level
    pub wanted: Vec<Token>,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "you're on {}, not ", self.current)?;
        for (i, token) in self.wanted.iter().enumerate() {
            if i > 0 {
                f.write_str(" or ")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}
