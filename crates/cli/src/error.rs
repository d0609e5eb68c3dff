//! Error types for CLI commands

use sysspec_core::RequirementSet;
use thiserror::Error;

/// Errors that can occur during command execution
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CommandError {
    /// Detection, configuration or matching error from the library crates
    #[error(transparent)]
    Core(#[from] sysspec_core::Error),

    /// The requirements don't match the current platform
    #[error("{requirements} doesn't match this platform: {reason}")]
    RequirementsNotMet {
        /// Requirements that were checked
        requirements: RequirementSet,
        /// Most specific explanation of the mismatch
        reason: String,
    },

    /// JSON serialization failed
    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for command operations
pub type Result<T> = std::result::Result<T, CommandError>;
