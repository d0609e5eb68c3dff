//! Common types shared across CLI commands

use std::sync::Arc;
use sysspec_config::Config;
use sysspec_engine::Platform;

/// Runtime context for CLI commands
///
/// Holds the loaded configuration and the detected platform so commands
/// don't need to detect or load anything themselves.
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    /// Shared configuration
    pub config: Arc<Config>,
    /// Platform the commands report on and match against
    pub platform: Arc<Platform>,
}

impl RuntimeContext {
    /// Create a new runtime context
    pub fn new(config: Config, platform: Platform) -> Self {
        Self {
            config: Arc::new(config),
            platform: Arc::new(platform),
        }
    }
}
