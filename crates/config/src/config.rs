//! Configuration management
//!
//! This module handles loading sysspec configuration.
//!
//! ```toml
//! [log]
//! level = "debug"
//! file = "sysspec.log"
//!
//! [probe]
//! uname = "uname -s"
//! osx = "sw_vers"
//! linux = "lsb_release -a"
//! ```

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use sysspec_core::{Error, SystemKind};

/// Logging configuration section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Default filter level (`trace`, `debug`, `info`, `warn`, `error`)
    #[serde(default = "default_level")]
    pub level: String,

    /// Optional file to append logs to
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
        }
    }
}

/// Commands used to identify the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeConfig {
    /// Root probe; must print `Linux` or `Darwin`
    #[serde(default = "default_uname")]
    pub uname: String,

    /// Version probe for Mac OS X
    #[serde(default = "default_osx")]
    pub osx: String,

    /// Version probe for Linux
    #[serde(default = "default_linux")]
    pub linux: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            uname: default_uname(),
            osx: default_osx(),
            linux: default_linux(),
        }
    }
}

impl ProbeConfig {
    /// Version probe command for a system family
    pub fn version_command(&self, system: SystemKind) -> &str {
        match system {
            SystemKind::Osx => &self.osx,
            SystemKind::Linux => &self.linux,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,

    /// Probe command settings
    #[serde(default)]
    pub probe: ProbeConfig,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_uname() -> String {
    "uname -s".to_string()
}

fn default_osx() -> String {
    "sw_vers".to_string()
}

fn default_linux() -> String {
    "lsb_release -a".to_string()
}

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Load configuration from a file
    ///
    /// Relative paths in the file are resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, TOML parsing fails or a value is invalid
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        let mut config = Self::from_toml_str(&content).map_err(|e| {
            Error::Config(format!("{} (in {})", config_message(&e), path.display()))
        })?;

        if let Some(parent) = path.parent() {
            config.resolve_relative_paths(parent);
        }

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load configuration from a TOML string
    ///
    /// # Errors
    ///
    /// Returns error if TOML parsing fails or a value is invalid
    pub fn from_toml_str(toml_content: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_content)
            .map_err(|e| Error::Config(format!("Failed to parse config TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the explicit config file, or the default one if it exists
    ///
    /// An explicit path must exist. A missing default file yields
    /// [`Config::default`].
    ///
    /// # Errors
    ///
    /// Returns error if the chosen file cannot be loaded
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match crate::dirs::default_config_file() {
            Some(path) if path.exists() => Self::load(path),
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if !LEVELS.contains(&self.log.level.to_lowercase().as_str()) {
            return Err(Error::Config(format!(
                "Invalid log level '{}'. Expected one of: {}",
                self.log.level,
                LEVELS.join(", ")
            )));
        }

        for (key, command) in [
            ("probe.uname", &self.probe.uname),
            ("probe.osx", &self.probe.osx),
            ("probe.linux", &self.probe.linux),
        ] {
            if command.trim().is_empty() {
                return Err(Error::Config(format!("{key} must not be empty")));
            }
        }

        Ok(())
    }

    fn resolve_relative_paths(&mut self, base: &Path) {
        if let Some(file) = &self.log.file
            && file.is_relative()
        {
            self.log.file = Some(base.join(file));
        }
    }
}

fn config_message(err: &Error) -> String {
    match err {
        Error::Config(message) => message.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use tempfile::TempDir;

    fn create_test_config(toml_content: &str) -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, toml_content).unwrap();
        (temp_dir, config_path)
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.log.level, "info");
        assert!(config.log.file.is_none());
        assert_eq!(config.probe.uname, "uname -s");
        assert_eq!(config.probe.version_command(SystemKind::Osx), "sw_vers");
        assert_eq!(
            config.probe.version_command(SystemKind::Linux),
            "lsb_release -a"
        );
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_toml_str(
            r#"
[probe]
linux = "cat /etc/lsb-release-dump"
"#,
        )
        .unwrap();
        assert_eq!(config.probe.linux, "cat /etc/lsb-release-dump");
        assert_eq!(config.probe.osx, "sw_vers");
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let err = Config::from_toml_str("[probe]\nlinx = \"x\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_invalid_level() {
        let err = Config::from_toml_str("[log]\nlevel = \"loud\"\n").unwrap_err();
        assert!(err.to_string().contains("Invalid log level 'loud'"));
    }

    #[test]
    fn test_rejects_empty_probe_command() {
        let err = Config::from_toml_str("[probe]\nuname = \"  \"\n").unwrap_err();
        assert!(err.to_string().contains("probe.uname"));
    }

    #[test]
    fn test_load_resolves_relative_log_file() {
        let (temp_dir, path) = create_test_config("[log]\nlevel = \"debug\"\nfile = \"out.log\"\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.file, Some(temp_dir.path().join("out.log")));
    }

    #[test]
    fn test_load_keeps_absolute_log_file() {
        let (_temp_dir, path) = create_test_config("[log]\nfile = \"/var/log/sysspec.log\"\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.log.file, Some(PathBuf::from("/var/log/sysspec.log")));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = Config::load(temp_dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_or_default_explicit_missing_fails() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.toml");
        assert!(Config::load_or_default(Some(&missing)).is_err());
    }

    #[test]
    fn test_load_or_default_explicit() {
        let (_temp_dir, path) = create_test_config("[probe]\nosx = \"sw_vers -productVersion\"\n");
        let config = Config::load_or_default(Some(&path)).unwrap();
        assert_eq!(config.probe.osx, "sw_vers -productVersion");
    }
}
