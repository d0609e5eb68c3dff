//! Meta dep registry
//!
//! A meta dep is a named template of dependency behaviour: which acceptors a
//! dep definition may fill (lists or blocks), plus default `met`/`meet`
//! callbacks and helpers. Deps are instantiated from a registered meta dep
//! against a platform, so definitions can be gated on requirement tokens.
//!
//! ```ignore
//! let mut registry = MetaRegistry::new();
//! registry.define("pkg", |meta| {
//!     meta.accepts_list_for("installs").template(|t| {
//!         t.met(|ctx| !ctx.list("installs").is_empty());
//!     });
//! })?;
//!
//! let dep = registry.dep("pkg", "git", platform, |dep| {
//!     dep.on("osx", |dep| {
//!         dep.list("installs", ["git"]);
//!     });
//!     dep.on("ubuntu", |dep| {
//!         dep.list("installs", ["git-core"]);
//!     });
//! })?;
//! ```

use crate::identity::SystemSpec;
use crate::matcher::Matcher;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use sysspec_core::{Error, RequirementSet, Result};
use tracing::{debug, trace};

/// `met?` callback: whether the dep is already satisfied
pub type MetFn = Arc<dyn Fn(&DepContext<'_>) -> bool + Send + Sync>;
/// `meet` callback: make the dep satisfied
pub type MeetFn = Arc<dyn Fn(&DepContext<'_>) -> Result<()> + Send + Sync>;
/// Named helper available to callbacks
pub type HelperFn = Arc<dyn Fn(&DepContext<'_>) -> String + Send + Sync>;
/// Block passed to a block acceptor
pub type BlockFn = Arc<dyn Fn() + Send + Sync>;

/// Meta dep names nobody may define
const RESERVED_NAMES: [&str; 1] = ["base"];

/// Kind of value an acceptor takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptorKind {
    /// A list of strings, appended to on each call
    List,
    /// A single block, replaced on each call
    Block,
}

/// Default behaviour inherited by every dep of a meta dep
#[derive(Clone, Default)]
pub struct Template {
    met: Option<MetFn>,
    meet: Option<MeetFn>,
    helpers: IndexMap<String, HelperFn>,
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("met", &self.met.is_some())
            .field("meet", &self.meet.is_some())
            .field("helpers", &self.helpers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Template {
    /// Set the default `met?` check
    pub fn met<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&DepContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.met = Some(Arc::new(f));
        self
    }

    /// Set the default `meet` action
    pub fn meet<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&DepContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.meet = Some(Arc::new(f));
        self
    }

    /// Add a named helper
    pub fn helper<F>(&mut self, name: &str, f: F) -> &mut Self
    where
        F: Fn(&DepContext<'_>) -> String + Send + Sync + 'static,
    {
        self.helpers.insert(name.to_string(), Arc::new(f));
        self
    }
}

/// A registered meta dep
#[derive(Debug, Clone)]
pub struct MetaDep {
    name: String,
    acceptors: IndexMap<String, AcceptorKind>,
    template: Template,
}

impl MetaDep {
    /// Registered name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of an acceptor, if declared
    pub fn acceptor(&self, name: &str) -> Option<AcceptorKind> {
        self.acceptors.get(name).copied()
    }

    /// Declared acceptors in declaration order
    pub fn acceptors(&self) -> impl Iterator<Item = (&str, AcceptorKind)> {
        self.acceptors.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    /// The template deps inherit from
    pub fn template(&self) -> &Template {
        &self.template
    }
}

/// Declares a meta dep's acceptors and template
#[derive(Debug, Default)]
pub struct MetaDepBuilder {
    acceptors: IndexMap<String, AcceptorKind>,
    template: Template,
}

impl MetaDepBuilder {
    /// Accept a list of values under `name`
    pub fn accepts_list_for(&mut self, name: &str) -> &mut Self {
        self.acceptors.insert(name.to_string(), AcceptorKind::List);
        self
    }

    /// Accept a block under `name`
    pub fn accepts_block_for(&mut self, name: &str) -> &mut Self {
        self.acceptors.insert(name.to_string(), AcceptorKind::Block);
        self
    }

    /// Configure the template
    pub fn template(&mut self, f: impl FnOnce(&mut Template)) -> &mut Self {
        f(&mut self.template);
        self
    }
}

/// Registry of meta deps, keyed by name
#[derive(Debug, Default)]
pub struct MetaRegistry {
    metas: IndexMap<String, MetaDep>,
}

fn normalize_name(raw: &str) -> &str {
    let raw = raw.trim();
    raw.strip_prefix(':').unwrap_or(raw)
}

impl MetaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a meta dep
    ///
    /// # Errors
    ///
    /// Fails if the name is blank, reserved or already defined.
    pub fn define(&mut self, name: &str, f: impl FnOnce(&mut MetaDepBuilder)) -> Result<&MetaDep> {
        let name = normalize_name(name);
        if name.is_empty() {
            return Err(Error::BlankMetaName);
        }
        if RESERVED_NAMES.contains(&name) {
            return Err(Error::ReservedMetaName {
                name: name.to_string(),
            });
        }
        if self.metas.contains_key(name) {
            return Err(Error::DuplicateMeta {
                name: name.to_string(),
            });
        }

        let mut builder = MetaDepBuilder::default();
        f(&mut builder);

        debug!(meta = name, acceptors = builder.acceptors.len(), "Defined meta dep");
        let meta = self.metas.entry(name.to_string()).or_insert(MetaDep {
            name: name.to_string(),
            acceptors: builder.acceptors,
            template: builder.template,
        });
        Ok(&*meta)
    }

    /// Look up a meta dep
    pub fn get(&self, name: &str) -> Option<&MetaDep> {
        self.metas.get(normalize_name(name))
    }

    /// Whether a meta dep is registered
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.metas.keys().map(String::as_str)
    }

    /// Instantiate a dep from a meta dep on the given platform
    ///
    /// # Errors
    ///
    /// Fails if the meta dep is unknown or the definition uses an acceptor
    /// the meta dep doesn't declare.
    pub fn dep(
        &self,
        meta: &str,
        name: &str,
        platform: &dyn SystemSpec,
        f: impl FnOnce(&mut DepDefiner<'_>),
    ) -> Result<Dep> {
        let meta = self.get(meta).ok_or_else(|| Error::UnknownMeta {
            name: normalize_name(meta).to_string(),
        })?;

        let mut definer = DepDefiner::new(meta, Matcher::new(platform));
        f(&mut definer);
        definer.finish(name)
    }
}

/// Collects a dep's definition
pub struct DepDefiner<'a> {
    meta: &'a MetaDep,
    matcher: Matcher<'a>,
    lists: IndexMap<String, Vec<String>>,
    blocks: IndexMap<String, BlockFn>,
    met: Option<MetFn>,
    meet: Option<MeetFn>,
    requires: Option<RequirementSet>,
    error: Option<Error>,
}

impl fmt::Debug for DepDefiner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DepDefiner")
            .field("meta", &self.meta.name)
            .field("lists", &self.lists)
            .field("blocks", &self.blocks.keys().collect::<Vec<_>>())
            .field("requires", &self.requires)
            .finish_non_exhaustive()
    }
}

impl<'a> DepDefiner<'a> {
    fn new(meta: &'a MetaDep, matcher: Matcher<'a>) -> Self {
        Self {
            meta,
            matcher,
            lists: IndexMap::new(),
            blocks: IndexMap::new(),
            met: None,
            meet: None,
            requires: None,
            error: None,
        }
    }

    fn check_acceptor(&mut self, acceptor: &str, kind: AcceptorKind) -> bool {
        if self.meta.acceptor(acceptor) == Some(kind) {
            return true;
        }
        // Keep the first error; later calls can't make the definition valid
        if self.error.is_none() {
            self.error = Some(Error::UnknownAcceptor {
                meta: self.meta.name.clone(),
                acceptor: acceptor.to_string(),
            });
        }
        false
    }

    /// Append values to a list acceptor
    pub fn list<I, S>(&mut self, acceptor: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.check_acceptor(acceptor, AcceptorKind::List) {
            self.lists
                .entry(acceptor.to_string())
                .or_default()
                .extend(values.into_iter().map(Into::into));
        }
        self
    }

    /// Set a block acceptor
    pub fn block<F>(&mut self, acceptor: &str, f: F) -> &mut Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        if self.check_acceptor(acceptor, AcceptorKind::Block) {
            self.blocks.insert(acceptor.to_string(), Arc::new(f));
        }
        self
    }

    /// Override the template's `met?` check
    pub fn met<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&DepContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.met = Some(Arc::new(f));
        self
    }

    /// Override the template's `meet` action
    pub fn meet<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&DepContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.meet = Some(Arc::new(f));
        self
    }

    /// Restrict the dep to platforms matching any of these tokens
    pub fn requires(&mut self, requirements: impl Into<RequirementSet>) -> &mut Self {
        self.requires = Some(requirements.into());
        self
    }

    /// Apply nested definitions only on platforms matching the requirements
    pub fn on(
        &mut self,
        requirements: impl Into<RequirementSet>,
        f: impl FnOnce(&mut Self),
    ) -> &mut Self {
        let requirements = requirements.into();
        if self.matcher.matches(&requirements) {
            f(self);
        } else {
            trace!(
                meta = %self.meta.name,
                %requirements,
                "Skipping definitions for other platforms"
            );
        }
        self
    }

    fn finish(self, name: &str) -> Result<Dep> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let mismatch = self.requires.as_ref().and_then(|requirements| {
            self.matcher.explain(requirements).map(|mismatch| mismatch.to_string())
        });
        // An empty requirement set never matches and has nothing to explain
        let mismatch = mismatch.or_else(|| {
            self.requires
                .as_ref()
                .filter(|requirements| requirements.is_empty())
                .map(|_| "no platforms are allowed".to_string())
        });

        let template = &self.meta.template;
        Ok(Dep {
            name: name.to_string(),
            meta: self.meta.name.clone(),
            lists: self.lists,
            blocks: self.blocks,
            helpers: template.helpers.clone(),
            met: self.met.or_else(|| template.met.clone()),
            meet: self.meet.or_else(|| template.meet.clone()),
            requires: self.requires,
            mismatch,
        })
    }
}

/// A dep instantiated from a meta dep
pub struct Dep {
    name: String,
    meta: String,
    lists: IndexMap<String, Vec<String>>,
    blocks: IndexMap<String, BlockFn>,
    helpers: IndexMap<String, HelperFn>,
    met: Option<MetFn>,
    meet: Option<MeetFn>,
    requires: Option<RequirementSet>,
    mismatch: Option<String>,
}

impl fmt::Debug for Dep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dep")
            .field("name", &self.name)
            .field("meta", &self.meta)
            .field("lists", &self.lists)
            .field("blocks", &self.blocks.keys().collect::<Vec<_>>())
            .field("requires", &self.requires)
            .field("mismatch", &self.mismatch)
            .finish_non_exhaustive()
    }
}

impl Dep {
    /// Dep name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the meta dep it was defined from
    pub fn meta(&self) -> &str {
        &self.meta
    }

    /// Platforms the dep is restricted to, if any
    pub fn requires(&self) -> Option<&RequirementSet> {
        self.requires.as_ref()
    }

    /// Callback view of this dep
    pub fn context(&self) -> DepContext<'_> {
        DepContext { dep: self }
    }

    /// Run a template helper
    pub fn helper(&self, name: &str) -> Option<String> {
        self.context().helper(name)
    }

    /// Fails if the dep's requirements exclude the platform it was defined on
    pub fn applicable(&self) -> Result<()> {
        match &self.mismatch {
            Some(differentiator) => Err(Error::PlatformMismatch {
                dep: self.name.clone(),
                differentiator: differentiator.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Whether the dep is already satisfied; unmet without a `met?` check
    pub fn met(&self) -> Result<bool> {
        self.applicable()?;
        let met = self.met.as_ref().is_some_and(|f| f(&self.context()));
        debug!(dep = %self.name, met, "Checked dep");
        Ok(met)
    }

    /// Run the `meet` action, if there is one
    pub fn meet(&self) -> Result<()> {
        self.applicable()?;
        match &self.meet {
            Some(f) => {
                debug!(dep = %self.name, "Meeting dep");
                f(&self.context())
            }
            None => Ok(()),
        }
    }
}

/// What `met?`, `meet` and helpers can see of their dep
#[derive(Clone, Copy)]
pub struct DepContext<'a> {
    dep: &'a Dep,
}

impl<'a> DepContext<'a> {
    /// Dep name
    pub fn name(&self) -> &'a str {
        &self.dep.name
    }

    /// Values given to a list acceptor; empty if never given
    pub fn list(&self, acceptor: &str) -> &'a [String] {
        self.dep
            .lists
            .get(acceptor)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Block given to a block acceptor
    pub fn block(&self, acceptor: &str) -> Option<&'a BlockFn> {
        self.dep.blocks.get(acceptor)
    }

    /// Call a block acceptor's block; returns whether one was set
    pub fn call_block(&self, acceptor: &str) -> bool {
        self.block(acceptor).map(|block| block()).is_some()
    }

    /// Run a template helper
    pub fn helper(&self, name: &str) -> Option<String> {
        self.dep.helpers.get(name).map(|helper| helper(self))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use crate::identity::Platform;
    use sysspec_core::{SystemKind, parse_kv};

    fn lucid() -> Platform {
        Platform::from_version_info(
            SystemKind::Linux,
            parse_kv("Distributor ID: Ubuntu\nRelease: 10.04\n"),
        )
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name(" :test "), "test");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn test_names_in_order() {
        let mut registry = MetaRegistry::new();
        registry.define("b", |_| {}).unwrap();
        registry.define(":a", |_| {}).unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert!(registry.contains(":a"));
    }

    #[test]
    fn test_acceptor_kind_mismatch() {
        let mut registry = MetaRegistry::new();
        registry
            .define("kinds", |meta| {
                meta.accepts_block_for("setup");
            })
            .unwrap();
        let err = registry
            .dep("kinds", "wrong", &lucid(), |dep| {
                dep.list("setup", ["x"]);
            })
            .unwrap_err();
        assert!(matches!(err, Error::UnknownAcceptor { acceptor, .. } if acceptor == "setup"));
    }

    #[test]
    fn test_empty_requirements_are_never_applicable() {
        let mut registry = MetaRegistry::new();
        registry.define("nothing", |_| {}).unwrap();
        let dep = registry
            .dep("nothing", "nowhere", &lucid(), |dep| {
                dep.requires(RequirementSet::new());
            })
            .unwrap();
        assert!(dep.applicable().is_err());
    }

    #[test]
    fn test_call_block_without_block() {
        let mut registry = MetaRegistry::new();
        registry
            .define("blocky", |meta| {
                meta.accepts_block_for("after");
            })
            .unwrap();
        let dep = registry.dep("blocky", "empty", &lucid(), |_| {}).unwrap();
        assert!(!dep.context().call_block("after"));
        assert!(dep.context().list("anything").is_empty());
    }
}
