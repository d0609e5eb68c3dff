//! Platform identity and requirement matching for sysspec
//!
//! This crate provides:
//! - Platform detection (`identity`): system, flavour, release and codename
//! - Requirement matching and mismatch explanations (`matcher`)
//! - Probe command execution on the host (`shell`)
//! - The meta dep registry for platform-aware dep definitions (`meta`)

pub mod identity;
pub mod matcher;
pub mod meta;
pub mod shell;

pub use identity::{Identity, LinuxSpec, OsxSpec, Platform, SystemSpec, current, current_with};
pub use matcher::{Matcher, Mismatch};
pub use meta::{
    AcceptorKind, Dep, DepContext, DepDefiner, MetaDep, MetaDepBuilder, MetaRegistry, Template,
};
pub use shell::ShellRunner;

// Re-export core types callers need alongside the engine
pub use sysspec_core::{Error, Level, RequirementSet, Result, SystemKind, Token};
