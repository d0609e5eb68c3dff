//! Core types and utilities for sysspec
//!
//! This is the foundation crate that all other sysspec crates depend on.
//! It provides:
//! - Base error types
//! - System families and requirement tokens
//! - The static release lookup tables
//! - Probe output parsing (`Key: Value` dumps)
//! - The command runner collaborator trait
//!
//! This crate has no dependencies on other sysspec crates.

pub mod error;
pub mod platform;
pub mod releases;
pub mod token;
pub mod traits;
pub mod version_info;

pub use error::{Error, Result};
pub use platform::SystemKind;
pub use token::{Level, RequirementSet, Token};
pub use traits::CommandRunner;
pub use version_info::{VersionInfo, parse_kv};
