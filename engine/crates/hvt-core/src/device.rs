//! Device inventory definitions

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default suffix appended to the hostname to locate a saved running config
pub const RUNNING_CONFIG_SUFFIX: &str = "_sh_run.cfg";

/// Kind of network device. Used for categorisation only; every kind is
/// audited with the same rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Switch,
    Router,
    #[default]
    Other,
}

impl DeviceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceKind::Switch => "switch",
            DeviceKind::Router => "router",
            DeviceKind::Other => "other",
        }
    }
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DeviceKind {
    type Err = DeviceKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "switch" => Ok(DeviceKind::Switch),
            "router" => Ok(DeviceKind::Router),
            "other" => Ok(DeviceKind::Other),
            other => Err(DeviceKindParseError(other.to_string())),
        }
    }
}

/// Error returned when a device kind string is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown device kind: {0}")]
pub struct DeviceKindParseError(pub String);

/// Identity and software metadata of an audited device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Device {
    pub hostname: String,
    #[serde(default)]
    pub kind: DeviceKind,
    /// Product ID (e.g. "C9300-48P")
    #[serde(default)]
    pub pid: Option<String>,
    /// Operating system name as reported by the device (e.g. "IOS-XE")
    #[serde(default)]
    pub os: Option<String>,
    /// Installed software version (e.g. "15.2(4)E10" or "17.9.4a")
    pub version: String,
    /// Chassis serial number
    #[serde(default)]
    pub serial: Option<String>,
}

impl Device {
    pub fn new(hostname: impl Into<String>, kind: DeviceKind, version: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            kind,
            pid: None,
            os: None,
            version: version.into(),
            serial: None,
        }
    }

    pub fn with_pid(mut self, pid: impl Into<String>) -> Self {
        self.pid = Some(pid.into());
        self
    }

    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = Some(os.into());
        self
    }

    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = Some(serial.into());
        self
    }

    /// Location of this device's saved running configuration inside `repo_dir`
    pub fn running_config_path(&self, repo_dir: impl AsRef<Path>, suffix: &str) -> PathBuf {
        repo_dir.as_ref().join(format!("{}{}", self.hostname, suffix))
    }
}
