//! Rule catalogue: the fixed hardening rules and declarative custom rules

use crate::generic::{self, ObjectsRule, TypedRule};
use crate::source::ConfigSource;
use hvt_common::{CustomRuleConfig, EvaluatorKind};
use hvt_core::{Error, Result, RuleCategory, RuleMetadata, RuleResult, Severity};
use regex::Regex;
use std::fmt;

/// Compile a built-in pattern. Failure here is a bug, not bad input.
pub(crate) fn fixed_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::Internal(format!("built-in pattern {}: {}", pattern, e)))
}

/// Compile a caller-supplied pattern, naming `param` on failure
pub(crate) fn rule_pattern(param: &str, pattern: &str) -> Result<Regex> {
    if pattern.trim().is_empty() {
        return Err(Error::invalid_parameter(param, "must not be empty"));
    }
    Regex::new(pattern).map_err(|e| Error::invalid_parameter(param, e.to_string()))
}

/// The fixed rule set evaluated for every device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FixedRule {
    IosVersion,
    LocalUsers,
    AaaNewModel,
    TacacsServers,
    TacacsSourceInterface,
    RadiusServers,
    RadiusSourceInterface,
    AaaAuthenticationLogin,
    AaaAuthenticationEnable,
    AaaAuthorizationExec,
    VtyLoginAuthentication,
    AaaAuthorizationCommands,
    AaaMaxFail,
    SnmpCommunity,
    SnmpVersion,
    SnmpTrapSource,
    SnmpEnableTraps,
}

impl FixedRule {
    pub const ALL: [FixedRule; 17] = [
        FixedRule::IosVersion,
        FixedRule::LocalUsers,
        FixedRule::AaaNewModel,
        FixedRule::TacacsServers,
        FixedRule::TacacsSourceInterface,
        FixedRule::RadiusServers,
        FixedRule::RadiusSourceInterface,
        FixedRule::AaaAuthenticationLogin,
        FixedRule::AaaAuthenticationEnable,
        FixedRule::AaaAuthorizationExec,
        FixedRule::VtyLoginAuthentication,
        FixedRule::AaaAuthorizationCommands,
        FixedRule::AaaMaxFail,
        FixedRule::SnmpCommunity,
        FixedRule::SnmpVersion,
        FixedRule::SnmpTrapSource,
        FixedRule::SnmpEnableTraps,
    ];

    /// Report key
    pub fn id(&self) -> &'static str {
        match self {
            FixedRule::IosVersion => "ios_version",
            FixedRule::LocalUsers => "local_users",
            FixedRule::AaaNewModel => "aaa_new_model",
            FixedRule::TacacsServers => "tacacs_servers",
            FixedRule::TacacsSourceInterface => "tacacs_source_interface",
            FixedRule::RadiusServers => "radius_servers",
            FixedRule::RadiusSourceInterface => "radius_source_interface",
            FixedRule::AaaAuthenticationLogin => "aaa_authentication_login",
            FixedRule::AaaAuthenticationEnable => "aaa_authentication_enable",
            FixedRule::AaaAuthorizationExec => "aaa_authorization_exec",
            FixedRule::VtyLoginAuthentication => "vty_login_authentication",
            FixedRule::AaaAuthorizationCommands => "aaa_authorization_commands",
            FixedRule::AaaMaxFail => "aaa_max_fail",
            FixedRule::SnmpCommunity => "snmp_community",
            FixedRule::SnmpVersion => "snmp_version",
            FixedRule::SnmpTrapSource => "snmp_trap_source",
            FixedRule::SnmpEnableTraps => "snmp_enable_traps",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rule| rule.id() == id)
    }

    pub fn metadata(&self) -> RuleMetadata {
        use RuleCategory::*;
        use Severity::*;

        let (name, category, severity, remediation) = match self {
            FixedRule::IosVersion => (
                "Software release at or above baseline",
                Software,
                High,
                "Upgrade to a supported IOS / IOS-XE release",
            ),
            FixedRule::LocalUsers => (
                "No privilege-15 local accounts",
                Accounts,
                High,
                "Keep a single low-privilege fallback account; grant level 15 through AAA",
            ),
            FixedRule::AaaNewModel => (
                "AAA new-model",
                Aaa,
                High,
                "Review the 'aaa new-model' statement",
            ),
            FixedRule::TacacsServers => (
                "TACACS+ servers defined",
                Aaa,
                High,
                "Define at least one 'tacacs-server host'",
            ),
            FixedRule::TacacsSourceInterface => (
                "TACACS+ source interface",
                Aaa,
                Low,
                "Set 'ip tacacs source-interface' to a loopback",
            ),
            FixedRule::RadiusServers => (
                "RADIUS servers defined",
                Aaa,
                Low,
                "Define 'radius server' entries",
            ),
            FixedRule::RadiusSourceInterface => (
                "RADIUS source interface",
                Aaa,
                Low,
                "Set 'ip radius source-interface' globally or in the server group",
            ),
            FixedRule::AaaAuthenticationLogin => (
                "Login authentication method list",
                Aaa,
                Medium,
                "Configure 'aaa authentication login default group tacacs+ local'",
            ),
            FixedRule::AaaAuthenticationEnable => (
                "Enable authentication method list",
                Aaa,
                Medium,
                "Configure 'aaa authentication enable default group tacacs+ enable'",
            ),
            FixedRule::AaaAuthorizationExec => (
                "Exec authorization method list",
                Aaa,
                Medium,
                "Configure 'aaa authorization exec default group tacacs+ local'",
            ),
            FixedRule::VtyLoginAuthentication => (
                "VTY login authentication",
                Management,
                Low,
                "Apply 'login authentication' under every 'line vty' range",
            ),
            FixedRule::AaaAuthorizationCommands => (
                "Command authorization",
                Aaa,
                High,
                "Configure 'aaa authorization commands 15 default group tacacs+'",
            ),
            FixedRule::AaaMaxFail => (
                "Local authentication lockout",
                Accounts,
                Low,
                "Set 'aaa local authentication attempts max-fail' to 3 or fewer",
            ),
            FixedRule::SnmpCommunity => (
                "SNMP community hygiene",
                Snmp,
                Critical,
                "Remove default communities and bind every community to an ACL",
            ),
            FixedRule::SnmpVersion => (
                "SNMP notification versions",
                Snmp,
                Medium,
                "Send notifications with SNMP v2c or v3 only",
            ),
            FixedRule::SnmpTrapSource => (
                "SNMP trap source",
                Snmp,
                Low,
                "Set 'snmp-server trap-source' to a loopback",
            ),
            FixedRule::SnmpEnableTraps => (
                "SNMP traps enabled",
                Snmp,
                Low,
                "Enable SNMP traps with 'snmp-server enable traps'",
            ),
        };

        RuleMetadata::new(self.id(), name, category, severity).with_remediation(remediation)
    }
}

impl fmt::Display for FixedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone)]
pub enum CustomRuleKind {
    Objects(ObjectsRule),
    Typed(TypedRule),
}

/// A declarative rule from the `[[rules]]` configuration section
#[derive(Debug, Clone)]
pub struct CustomRule {
    metadata: RuleMetadata,
    kind: CustomRuleKind,
}

impl CustomRule {
    /// Validate a configured rule. Every problem names the offending parameter.
    pub fn from_config(config: &CustomRuleConfig) -> Result<Self> {
        let name = config.name.trim();
        if name.is_empty() {
            return Err(Error::invalid_parameter("name", "must not be empty"));
        }
        if FixedRule::from_id(name).is_some() {
            return Err(Error::invalid_parameter(
                "name",
                format!("'{}' is a built-in rule", name),
            ));
        }
        let negate = config.negate.resolve()?;

        let kind = match config.evaluator {
            EvaluatorKind::Objects => {
                if config.default.is_some() {
                    return Err(Error::invalid_parameter(
                        "default",
                        "only typed rules take a default",
                    ));
                }
                CustomRuleKind::Objects(ObjectsRule::new(&config.pattern, config.weight, negate)?)
            }
            EvaluatorKind::Typed => {
                let default = config
                    .default
                    .as_deref()
                    .ok_or_else(|| Error::invalid_parameter("default", "typed rules need one"))?;
                CustomRuleKind::Typed(TypedRule::new(
                    &config.pattern,
                    default,
                    config.weight,
                    negate,
                )?)
            }
        };

        let mut metadata = RuleMetadata::new(
            name,
            name,
            RuleCategory::Custom,
            Severity::from_weight(config.weight),
        );
        if let Some(description) = &config.description {
            metadata = metadata.with_description(description);
        }

        Ok(Self { metadata, kind })
    }

    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    pub fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    pub fn kind(&self) -> &CustomRuleKind {
        &self.kind
    }

    pub fn evaluate<S: ConfigSource + ?Sized>(&self, src: &S) -> Result<RuleResult> {
        match &self.kind {
            CustomRuleKind::Objects(rule) => Ok(generic::objects(src, rule)),
            CustomRuleKind::Typed(rule) => generic::typed(src, rule),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ParsedConfig;
    use hvt_common::NegateFlag;
    use std::collections::HashSet;

    fn rule_config(evaluator: EvaluatorKind) -> CustomRuleConfig {
        CustomRuleConfig {
            name: "password_encryption".into(),
            evaluator,
            pattern: r"^service\s+password-encryption".into(),
            weight: 3,
            negate: NegateFlag::Flag(true),
            default: None,
            description: Some("Passwords are stored encrypted".into()),
        }
    }

    #[test]
    fn test_catalogue_ids_are_unique() {
        let ids: HashSet<&str> = FixedRule::ALL.iter().map(|r| r.id()).collect();
        assert_eq!(ids.len(), FixedRule::ALL.len());
        for rule in FixedRule::ALL {
            assert_eq!(FixedRule::from_id(rule.id()), Some(rule));
            let meta = rule.metadata();
            assert_eq!(meta.id, rule.id());
            assert!(meta.remediation.is_some());
        }
        assert_eq!(FixedRule::from_id("nope"), None);
    }

    #[test]
    fn test_custom_objects_rule() {
        let rule = CustomRule::from_config(&rule_config(EvaluatorKind::Objects)).unwrap();
        assert_eq!(rule.id(), "password_encryption");
        assert_eq!(rule.metadata().category, RuleCategory::Custom);
        assert_eq!(rule.metadata().severity, Severity::Medium);

        let config = ParsedConfig::parse("service password-encryption\n");
        let result = rule.evaluate(&config).unwrap();
        assert!(result.satisfied);
        assert_eq!(result.achieved, 3);
    }

    #[test]
    fn test_custom_typed_rule() {
        let mut cfg = rule_config(EvaluatorKind::Typed);
        cfg.name = "ssh_v2".into();
        cfg.pattern = r"^ip\s+ssh\s+version\s+(\d)".into();
        cfg.default = Some("0".into());
        let rule = CustomRule::from_config(&cfg).unwrap();

        let result = rule.evaluate(&ParsedConfig::parse("ip ssh version 2\n")).unwrap();
        assert!(result.satisfied);
        let result = rule.evaluate(&ParsedConfig::parse("hostname r1\n")).unwrap();
        assert!(!result.satisfied);
    }

    #[test]
    fn test_custom_rule_validation() {
        let param = |cfg: &CustomRuleConfig| match CustomRule::from_config(cfg) {
            Err(Error::InvalidParameter { param, .. }) => param,
            other => panic!("expected a parameter error, got {other:?}"),
        };

        let mut cfg = rule_config(EvaluatorKind::Objects);
        cfg.name = " ".into();
        assert_eq!(param(&cfg), "name");

        let mut cfg = rule_config(EvaluatorKind::Objects);
        cfg.name = "aaa_new_model".into();
        assert_eq!(param(&cfg), "name");

        let mut cfg = rule_config(EvaluatorKind::Objects);
        cfg.default = Some("0".into());
        assert_eq!(param(&cfg), "default");

        assert_eq!(param(&rule_config(EvaluatorKind::Typed)), "default");

        let mut cfg = rule_config(EvaluatorKind::Objects);
        cfg.negate = NegateFlag::Legacy("not False".into());
        assert_eq!(param(&cfg), "negate");

        let mut cfg = rule_config(EvaluatorKind::Objects);
        cfg.pattern = String::new();
        assert_eq!(param(&cfg), "pattern");
    }

    #[test]
    fn test_fixed_pattern_reports_internal_error() {
        assert!(matches!(fixed_pattern("("), Err(Error::Internal(_))));
        assert!(fixed_pattern(r"^aaa\s+new-model").is_ok());
    }
}
