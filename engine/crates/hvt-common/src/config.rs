//! Configuration management for HVT

use hvt_core::{Device, Error, Result, RUNNING_CONFIG_SUFFIX};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where running configurations live and how results are judged
    #[serde(default)]
    pub audit: AuditConfig,

    /// Minimum accepted software versions
    #[serde(default)]
    pub version: VersionConfig,

    /// Parameters of the SNMP rules
    #[serde(default)]
    pub snmp: SnmpConfig,

    /// Additional declarative rules
    #[serde(default)]
    pub rules: Vec<CustomRuleConfig>,

    /// Device inventory
    #[serde(default)]
    pub devices: Vec<Device>,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Configuration(format!("Failed to parse config: {}", e)))
    }

    /// Create a configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Look up an inventory entry by hostname
    pub fn device(&self, hostname: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.hostname == hostname)
    }

    /// Merge with environment variables (HVT_ prefix)
    pub fn merge_env(mut self) -> Result<Self> {
        if let Ok(val) = std::env::var("HVT_REPO_DIR") {
            self.audit.repo_dir = val;
        }
        if let Ok(val) = std::env::var("HVT_CONFIG_SUFFIX") {
            self.audit.config_suffix = val;
        }
        if let Ok(val) = std::env::var("HVT_FAIL_UNDER") {
            let pct = val.parse::<f64>().map_err(|e| Error::InvalidConfig {
                key: "HVT_FAIL_UNDER".into(),
                message: e.to_string(),
            })?;
            self.audit.fail_under = Some(pct);
        }

        if let Ok(val) = std::env::var("HVT_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("HVT_LOG_FORMAT") {
            self.logging.format = val;
        }

        Ok(self)
    }
}

/// Audit run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Directory holding `<hostname><config_suffix>` files
    #[serde(default = "default_repo_dir")]
    pub repo_dir: String,

    #[serde(default = "default_config_suffix")]
    pub config_suffix: String,

    /// Minimum score percentage a device must reach (None = never fail)
    #[serde(default)]
    pub fail_under: Option<f64>,
}

fn default_repo_dir() -> String {
    String::from("./repo")
}

fn default_config_suffix() -> String {
    String::from(RUNNING_CONFIG_SUFFIX)
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            repo_dir: default_repo_dir(),
            config_suffix: default_config_suffix(),
            fail_under: None,
        }
    }
}

/// Minimum versions, written the way the device reports them
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VersionConfig {
    /// Classic IOS baseline, `MAJOR.MINOR(PATCH)`
    #[serde(default = "default_ios_baseline")]
    pub ios_baseline: String,

    /// IOS-XE baseline, `MAJOR.MINOR.PATCH`
    #[serde(default = "default_iosxe_baseline")]
    pub iosxe_baseline: String,
}

fn default_ios_baseline() -> String {
    String::from("12.4(6)")
}

fn default_iosxe_baseline() -> String {
    String::from("16.6.4")
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self {
            ios_baseline: default_ios_baseline(),
            iosxe_baseline: default_iosxe_baseline(),
        }
    }
}

/// SNMP rule parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnmpConfig {
    #[serde(default = "default_community")]
    pub community: PatternRuleConfig,

    /// Notification receivers, classified by SNMP version
    #[serde(default = "default_version")]
    pub version: PatternRuleConfig,

    #[serde(default = "default_trap_source")]
    pub trap_source: PatternRuleConfig,

    #[serde(default = "default_enable")]
    pub enable: PatternRuleConfig,
}

/// A regex with the number of points it is worth
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternRuleConfig {
    pub pattern: String,
    pub weight: u32,
}

impl PatternRuleConfig {
    pub fn new(pattern: impl Into<String>, weight: u32) -> Self {
        Self {
            pattern: pattern.into(),
            weight,
        }
    }
}

/// Group 3 is the access list: an `ipv6 <acl>` clause (optionally followed
/// by an IPv4 ACL) or a plain IPv4 ACL
fn default_community() -> PatternRuleConfig {
    PatternRuleConfig::new(
        r"^(snmp-server\s+community)\s+(\S+)(?:\s+view\s+\S+)?(?:\s+(?:RO|RW|ro|rw))?(?:\s+(ipv6\s+\S+(?:\s+\S+)?|\S+))?\s*$",
        6,
    )
}

fn default_version() -> PatternRuleConfig {
    PatternRuleConfig::new(r"^snmp-server\s+host\s+\S+", 3)
}

fn default_trap_source() -> PatternRuleConfig {
    PatternRuleConfig::new(r"^snmp-server\s+trap-source\s+\S+", 2)
}

fn default_enable() -> PatternRuleConfig {
    PatternRuleConfig::new(r"^snmp-server\s+enable\s+traps", 2)
}

impl Default for SnmpConfig {
    fn default() -> Self {
        Self {
            community: default_community(),
            version: default_version(),
            trap_source: default_trap_source(),
            enable: default_enable(),
        }
    }
}

/// Which generic evaluator a custom rule uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluatorKind {
    /// Presence of any matching line
    Objects,
    /// Value captured from the first matching line
    Typed,
}

/// The negation flag as written in the configuration file.
///
/// Older rule files spell it as the strings `"True"` / `"False"`; those are
/// accepted, anything else is rejected when the rule is validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NegateFlag {
    Flag(bool),
    Legacy(String),
}

impl NegateFlag {
    pub fn resolve(&self) -> Result<bool> {
        match self {
            NegateFlag::Flag(b) => Ok(*b),
            NegateFlag::Legacy(s) if s.eq_ignore_ascii_case("true") => Ok(true),
            NegateFlag::Legacy(s) if s.eq_ignore_ascii_case("false") => Ok(false),
            NegateFlag::Legacy(s) => Err(Error::invalid_parameter(
                "negate",
                format!("expected true or false, got '{}'", s),
            )),
        }
    }
}

impl From<bool> for NegateFlag {
    fn from(b: bool) -> Self {
        NegateFlag::Flag(b)
    }
}

/// A declarative rule as written in `[[rules]]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomRuleConfig {
    /// Report key for this rule
    pub name: String,
    pub evaluator: EvaluatorKind,
    pub pattern: String,
    pub weight: u32,
    pub negate: NegateFlag,
    /// Fallback value for `typed` rules when nothing matches
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (pretty, json, compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    String::from("info")
}

fn default_log_format() -> String {
    String::from("pretty")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Builder for constructing Config
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn repo_dir(mut self, dir: impl Into<String>) -> Self {
        self.config.audit.repo_dir = dir.into();
        self
    }

    pub fn fail_under(mut self, pct: f64) -> Self {
        self.config.audit.fail_under = Some(pct);
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn device(mut self, device: Device) -> Self {
        self.config.devices.push(device);
        self
    }

    pub fn rule(mut self, rule: CustomRuleConfig) -> Self {
        self.config.rules.push(rule);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hvt_core::DeviceKind;
    use std::io::Write;

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            [audit]
            repo_dir = "/srv/configs"
            fail_under = 70.0

            [snmp.community]
            pattern = '^(snmp-server\s+community)\s+(\S+)\s+\S+(?:\s+(\S+))?'
            weight = 6

            [[rules]]
            name = "no_http_server"
            evaluator = "objects"
            pattern = '^no\s+ip\s+http\s+server'
            weight = 2
            negate = "True"

            [[devices]]
            hostname = "edge-r1"
            kind = "router"
            version = "15.4(3)M"

            [logging]
            level = "debug"
            format = "json"
        "#;

        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.audit.repo_dir, "/srv/configs");
        assert_eq!(config.audit.config_suffix, "_sh_run.cfg");
        assert_eq!(config.audit.fail_under, Some(70.0));
        assert_eq!(config.snmp.community.weight, 6);
        assert_eq!(config.snmp.trap_source.weight, 2);
        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.rules[0].evaluator, EvaluatorKind::Objects);
        assert_eq!(config.rules[0].negate.resolve().unwrap(), true);
        assert_eq!(config.device("edge-r1").unwrap().kind, DeviceKind::Router);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_unknown_rule_field_rejected() {
        let toml = r#"
            [[rules]]
            name = "x"
            evaluator = "objects"
            pattern = "^x"
            weight = 1
            negate = false
            in_test = "legacy"
        "#;
        let err = Config::from_toml(toml).unwrap_err();
        assert!(err.to_string().contains("in_test"));
    }

    #[test]
    fn test_wrong_weight_type_rejected() {
        let toml = r#"
            [[rules]]
            name = "x"
            evaluator = "typed"
            pattern = "^x"
            weight = "five"
            negate = false
        "#;
        assert!(Config::from_toml(toml).is_err());
    }

    #[test]
    fn test_unknown_evaluator_rejected() {
        let toml = r#"
            [[rules]]
            name = "x"
            evaluator = "eval"
            pattern = "^x"
            weight = 1
            negate = false
        "#;
        assert!(Config::from_toml(toml).is_err());
    }

    #[test]
    fn test_negate_flag_resolution() {
        assert!(NegateFlag::Flag(true).resolve().unwrap());
        assert!(!NegateFlag::Legacy("False".into()).resolve().unwrap());
        assert!(NegateFlag::Legacy("TRUE".into()).resolve().unwrap());

        let err = NegateFlag::Legacy("1 == 1".into()).resolve().unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { ref param, .. } if param == "negate"));
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[audit]\nrepo_dir = \"./backups\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.audit.repo_dir, "./backups");
        assert!(Config::from_file("/nonexistent/hvt.toml").is_err());
    }

    // The only test in this crate that touches HVT_* variables
    #[test]
    fn test_merge_env_overrides_toml() {
        let toml = r#"
            [audit]
            repo_dir = "/srv/configs"
            fail_under = 70.0
        "#;

        std::env::set_var("HVT_REPO_DIR", "/mnt/backups");
        std::env::set_var("HVT_FAIL_UNDER", "85.5");
        let config = Config::from_toml(toml).unwrap().merge_env();
        std::env::remove_var("HVT_REPO_DIR");

        let config = config.unwrap();
        assert_eq!(config.audit.repo_dir, "/mnt/backups");
        assert_eq!(config.audit.fail_under, Some(85.5));
        assert_eq!(config.audit.config_suffix, "_sh_run.cfg");

        std::env::set_var("HVT_FAIL_UNDER", "most");
        let err = Config::from_toml(toml).unwrap().merge_env().unwrap_err();
        std::env::remove_var("HVT_FAIL_UNDER");
        assert!(matches!(err, Error::InvalidConfig { ref key, .. } if key == "HVT_FAIL_UNDER"));
    }

    #[test]
    fn test_config_builder() {
        let config = Config::builder()
            .repo_dir("/tmp/repo")
            .fail_under(80.0)
            .log_level("warn")
            .device(Device::new("sw1", DeviceKind::Switch, "16.9.3"))
            .build();

        assert_eq!(config.audit.repo_dir, "/tmp/repo");
        assert_eq!(config.audit.fail_under, Some(80.0));
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.devices.len(), 1);
        assert_eq!(config.version.iosxe_baseline, "16.6.4");
    }
}
