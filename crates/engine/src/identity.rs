//! Platform identity detection
//!
//! A platform is identified at four escalating levels:
//! - system: `linux` or `osx`, from `uname -s`
//! - flavour: the distribution (`ubuntu`); on osx it equals the system
//! - release: the raw version string (`10.04`, `10.6`)
//! - name: the codename (`lucid`), looked up from the release tables
//!
//! Detection runs the family's version probe once and keeps its `Key: Value`
//! dump verbatim. Missing or unrecognised fields degrade to `None`/empty so
//! that matching can still answer "no match".

use crate::matcher::Matcher;
use crate::shell::ShellRunner;
use regex::Regex;
use serde::Serialize;
use std::sync::{LazyLock, Mutex, OnceLock, PoisonError};
use sysspec_config::ProbeConfig;
use sysspec_core::releases;
use sysspec_core::{CommandRunner, Level, RequirementSet, Result, SystemKind, VersionInfo, parse_kv};
use tracing::{debug, warn};

static MAJOR_MINOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+").expect("MAJOR.MINOR pattern is valid"));

/// Identity levels shared by every system family
pub trait SystemSpec {
    /// System family
    fn system(&self) -> SystemKind;

    /// Distribution identifier, if it could be determined
    fn flavour(&self) -> Option<&str>;

    /// Human-facing distribution name, if it could be determined
    fn flavour_str(&self) -> Option<&str>;

    /// Release string used for codename lookup; empty when unknown
    fn release(&self) -> &str;

    /// Full version as reported by the probe
    fn version(&self) -> Option<&str>;

    /// Raw probe output
    fn version_info(&self) -> &VersionInfo;

    /// Human-facing system name
    fn system_str(&self) -> &str {
        self.system().display_str()
    }

    /// Codename token, if the release is known
    fn name(&self) -> Option<&'static str> {
        releases::name_for(self.system(), self.flavour()?, self.release())
    }

    /// Human-facing codename, if the release is known
    fn name_str(&self) -> Option<&'static str> {
        releases::display_for(self.system(), self.flavour()?, self.release())
    }

    /// Display value of this platform at a given level
    fn str_for(&self, level: Level) -> Option<&str> {
        match level {
            Level::System => Some(self.system_str()),
            Level::Flavour => self.flavour_str(),
            Level::Name => self.name_str(),
        }
    }

    /// Whether this is a Linux host
    fn is_linux(&self) -> bool {
        self.system() == SystemKind::Linux
    }

    /// Whether this is a Mac OS X host
    fn is_osx(&self) -> bool {
        self.system() == SystemKind::Osx
    }
}

/// Mac OS X identity, built from `sw_vers`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsxSpec {
    version_info: VersionInfo,
    release: String,
}

impl OsxSpec {
    /// Build from an already parsed `sw_vers` dump
    pub fn from_version_info(version_info: VersionInfo) -> Self {
        let release = version_info
            .val_for("ProductVersion")
            .and_then(|version| MAJOR_MINOR.find(version.trim()))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        if release.is_empty() {
            warn!(
                version = ?version_info.val_for("ProductVersion"),
                "Could not extract a MAJOR.MINOR release from ProductVersion"
            );
        }

        Self {
            version_info,
            release,
        }
    }

    /// Run the version probe and parse its output
    pub fn probe<R: CommandRunner + ?Sized>(runner: &R, command: &str) -> Result<Self> {
        Ok(Self::from_version_info(parse_kv(&runner.run(command)?)))
    }
}

impl SystemSpec for OsxSpec {
    fn system(&self) -> SystemKind {
        SystemKind::Osx
    }

    fn flavour(&self) -> Option<&str> {
        Some(self.system().as_str())
    }

    fn flavour_str(&self) -> Option<&str> {
        Some(self.system_str())
    }

    fn release(&self) -> &str {
        &self.release
    }

    fn version(&self) -> Option<&str> {
        non_blank(self.version_info.val_for("ProductVersion"))
    }

    fn version_info(&self) -> &VersionInfo {
        &self.version_info
    }
}

/// Linux identity, built from `lsb_release -a`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinuxSpec {
    version_info: VersionInfo,
    flavour: Option<String>,
}

impl LinuxSpec {
    /// Build from an already parsed `lsb_release -a` dump
    pub fn from_version_info(version_info: VersionInfo) -> Self {
        let flavour = version_info
            .val_for("Distributor ID")
            .map(symbolize)
            .filter(|flavour| !flavour.is_empty());

        if flavour.is_none() {
            warn!("Probe output has no 'Distributor ID'; flavour is unknown");
        }
        if non_blank(version_info.val_for("Release")).is_none() {
            warn!("Probe output has no 'Release'; release is unknown");
        }

        Self {
            version_info,
            flavour,
        }
    }

    /// Run the version probe and parse its output
    pub fn probe<R: CommandRunner + ?Sized>(runner: &R, command: &str) -> Result<Self> {
        Ok(Self::from_version_info(parse_kv(&runner.run(command)?)))
    }
}

impl SystemSpec for LinuxSpec {
    fn system(&self) -> SystemKind {
        SystemKind::Linux
    }

    fn flavour(&self) -> Option<&str> {
        self.flavour.as_deref()
    }

    fn flavour_str(&self) -> Option<&str> {
        // Only when the distributor could be symbolised into a flavour
        self.flavour.as_ref()?;
        self.version_info.val_for("Distributor ID")
    }

    fn release(&self) -> &str {
        self.version().unwrap_or_default()
    }

    fn version(&self) -> Option<&str> {
        non_blank(self.version_info.val_for("Release"))
    }

    fn version_info(&self) -> &VersionInfo {
        &self.version_info
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Lowercase identifier form of a distributor name ("Linux Mint" → `linux_mint`)
fn symbolize(raw: &str) -> String {
    raw.split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// The detected platform, one variant per system family
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    /// Mac OS X host
    Osx(OsxSpec),
    /// Linux host
    Linux(LinuxSpec),
}

impl Platform {
    /// Detect the host using the default probe commands
    pub fn detect<R: CommandRunner + ?Sized>(runner: &R) -> Result<Self> {
        Self::detect_with(runner, &ProbeConfig::default())
    }

    /// Detect the host using configured probe commands
    ///
    /// Runs the root probe, picks the system family from its output, then
    /// runs that family's version probe. Neither probe is retried.
    pub fn detect_with<R: CommandRunner + ?Sized>(runner: &R, probe: &ProbeConfig) -> Result<Self> {
        let uname = runner.run(&probe.uname)?;
        let system = SystemKind::from_uname(&uname)?;
        debug!(%system, "Detected system family");

        let command = probe.version_command(system);
        let platform = match system {
            SystemKind::Osx => Self::Osx(OsxSpec::probe(runner, command)?),
            SystemKind::Linux => Self::Linux(LinuxSpec::probe(runner, command)?),
        };

        debug!(
            flavour = ?platform.flavour(),
            release = platform.release(),
            name = ?platform.name(),
            "Detected platform"
        );
        Ok(platform)
    }

    /// Build an identity from a version dump without running any probe
    pub fn from_version_info(system: SystemKind, version_info: VersionInfo) -> Self {
        match system {
            SystemKind::Osx => Self::Osx(OsxSpec::from_version_info(version_info)),
            SystemKind::Linux => Self::Linux(LinuxSpec::from_version_info(version_info)),
        }
    }

    /// The family-specific identity
    pub fn spec(&self) -> &dyn SystemSpec {
        match self {
            Self::Osx(spec) => spec,
            Self::Linux(spec) => spec,
        }
    }

    /// Matcher bound to this platform
    pub fn matcher(&self) -> Matcher<'_> {
        Matcher::new(self.spec())
    }

    /// Whether any token in the requirements matches this platform
    pub fn matches(&self, requirements: impl Into<RequirementSet>) -> bool {
        self.matcher().matches(&requirements.into())
    }

    /// Most specific explanation of why the requirements don't match
    pub fn differentiator_for(&self, requirements: impl Into<RequirementSet>) -> Option<&str> {
        self.matcher().differentiator_for(&requirements.into())
    }

    /// Snapshot of every identity level, for display
    pub fn identity(&self) -> Identity {
        Identity {
            system: self.system(),
            system_str: self.system_str().to_string(),
            flavour: self.flavour().map(str::to_string),
            flavour_str: self.flavour_str().map(str::to_string),
            release: self.release().to_string(),
            version: self.version().map(str::to_string),
            name: self.name(),
            name_str: self.name_str(),
        }
    }
}

impl SystemSpec for Platform {
    fn system(&self) -> SystemKind {
        self.spec().system()
    }

    fn flavour(&self) -> Option<&str> {
        self.spec().flavour()
    }

    fn flavour_str(&self) -> Option<&str> {
        self.spec().flavour_str()
    }

    fn release(&self) -> &str {
        self.spec().release()
    }

    fn version(&self) -> Option<&str> {
        self.spec().version()
    }

    fn version_info(&self) -> &VersionInfo {
        self.spec().version_info()
    }
}

/// Every identity level of a platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    /// System family
    pub system: SystemKind,
    /// Human-facing system name
    pub system_str: String,
    /// Distribution identifier
    pub flavour: Option<String>,
    /// Human-facing distribution name
    pub flavour_str: Option<String>,
    /// Release used for codename lookup
    pub release: String,
    /// Full reported version
    pub version: Option<String>,
    /// Codename token
    pub name: Option<&'static str>,
    /// Human-facing codename
    pub name_str: Option<&'static str>,
}

static CURRENT: OnceLock<Platform> = OnceLock::new();
static DETECTING: Mutex<()> = Mutex::new(());

/// The platform this process runs on
///
/// Detected on first call with the default probe commands and cached for the
/// lifetime of the process.
pub fn current() -> Result<&'static Platform> {
    current_with(&ProbeConfig::default())
}

/// Like [`current`], but detects with the given probe commands
///
/// The commands only matter for the first successful call; a failed
/// detection is not cached. Concurrent first callers wait for a single
/// detection instead of each running the probes.
pub fn current_with(probe: &ProbeConfig) -> Result<&'static Platform> {
    detect_once(&CURRENT, &DETECTING, || {
        Platform::detect_with(&ShellRunner, probe)
    })
}

fn detect_once<'a>(
    cell: &'a OnceLock<Platform>,
    lock: &Mutex<()>,
    detect: impl FnOnce() -> Result<Platform>,
) -> Result<&'a Platform> {
    if let Some(platform) = cell.get() {
        return Ok(platform);
    }

    let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(platform) = cell.get() {
        return Ok(platform);
    }
    let detected = detect()?;
    Ok(cell.get_or_init(|| detected))
}
