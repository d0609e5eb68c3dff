//! Base error types for sysspec
//!
//! This module provides the foundation error types that all crates can use.
//! Only identity construction and meta dep declaration can fail; matching a
//! requirement against the platform never produces an error.

use thiserror::Error;

/// Base error type for shared functionality
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The root probe reported a kernel we have no identity provider for
    #[error("Unsupported system: `uname -s` reported '{uname}'")]
    UnsupportedSystem {
        /// Raw value reported by the root probe
        uname: String,
    },

    /// A probe command could not be run or exited unsuccessfully
    #[error("Failed to run '{command}': {message}")]
    ProbeExecution {
        /// The command line that was attempted
        command: String,
        /// What went wrong
        message: String,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// Meta dep declared without a name
    #[error("You can't define a meta dep with a blank name.")]
    BlankMetaName,

    /// Meta dep declared with a reserved name
    #[error("You can't use '{name}' for a meta dep name, because it's reserved.")]
    ReservedMetaName {
        /// The reserved name
        name: String,
    },

    /// Meta dep declared twice
    #[error("A meta dep called '{name}' has already been defined.")]
    DuplicateMeta {
        /// The duplicated name
        name: String,
    },

    /// Dep instantiated from a meta dep that was never declared
    #[error("There is no meta dep called '{name}'.")]
    UnknownMeta {
        /// The missing meta dep name
        name: String,
    },

    /// Dep definition used an acceptor its meta dep doesn't declare
    #[error("The '{meta}' meta dep doesn't accept '{acceptor}'.")]
    UnknownAcceptor {
        /// Meta dep the dep was defined against
        meta: String,
        /// The undeclared acceptor
        acceptor: String,
    },

    /// Dep was asked to run on a platform its requirements exclude
    #[error("'{dep}' doesn't apply here: {differentiator}")]
    PlatformMismatch {
        /// Dep name
        dep: String,
        /// Human readable explanation of the mismatch
        differentiator: String,
    },

    /// Generic error message
    #[error("{0}")]
    Message(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_meta_name_messages() {
        assert_eq!(
            Error::BlankMetaName.to_string(),
            "You can't define a meta dep with a blank name."
        );
        assert_eq!(
            Error::ReservedMetaName {
                name: "base".to_string()
            }
            .to_string(),
            "You can't use 'base' for a meta dep name, because it's reserved."
        );
        assert_eq!(
            Error::DuplicateMeta {
                name: "duplicate".to_string()
            }
            .to_string(),
            "A meta dep called 'duplicate' has already been defined."
        );
    }

    #[test]
    fn test_probe_execution_message() {
        let err = Error::ProbeExecution {
            command: "lsb_release -a".to_string(),
            message: "command not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to run 'lsb_release -a': command not found"
        );
    }
}
