//! XDG directory utilities
//!
//! This module provides XDG-compliant directory paths for sysspec.
//! `XDG_CONFIG_HOME` defaults to ~/.config.

use std::path::PathBuf;
use xdg::BaseDirectories;

/// Get the sysspec config directory
///
/// Returns `$XDG_CONFIG_HOME/sysspec` or `~/.config/sysspec`
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    BaseDirectories::with_prefix("sysspec").get_config_home()
}

/// Get the default config file path
///
/// Returns `$XDG_CONFIG_HOME/sysspec/config.toml` or `~/.config/sysspec/config.toml`
#[must_use]
pub fn default_config_file() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}
