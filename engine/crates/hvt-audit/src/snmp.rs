//! SNMP community and feature auditors

use crate::checks::{fixed_pattern, rule_pattern};
use crate::source::{ConfigSource, ParsedLine};
use hvt_core::{Error, Result, RuleResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest score the community table awards
pub const COMMUNITY_MAX_SCORE: u32 = 6;
/// Points lost to a clean (unrestricted) community or to a well-known name
pub const COMMUNITY_STEP: u32 = 3;

/// Community names shipped as factory defaults
const INSECURE_COMMUNITIES: [&str; 2] = ["public", "private"];

/// Community rule parameters: a pattern capturing (prefix, community, acl)
#[derive(Debug, Clone)]
pub struct SnmpCommunityRule {
    pattern: Regex,
    weight: u32,
}

impl SnmpCommunityRule {
    pub fn new(pattern: &str, weight: u32) -> Result<Self> {
        let pattern = rule_pattern("pattern", pattern)?;
        if pattern.captures_len() < 4 {
            return Err(Error::invalid_parameter(
                "pattern",
                "needs three capture groups: prefix, community name, ACL",
            ));
        }
        if weight < COMMUNITY_MAX_SCORE {
            return Err(Error::invalid_parameter(
                "weight",
                format!("must be at least {}", COMMUNITY_MAX_SCORE),
            ));
        }
        Ok(Self { pattern, weight })
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnmpCommunityAudit {
    /// `satisfied` is the compliance verdict; `achieved` follows the score table
    pub result: RuleResult,
    /// Communities without an ACL
    pub clean: Vec<String>,
    /// Communities restricted by an ACL
    pub acl_restricted: Vec<String>,
    /// Matching community names that are `public` or `private`
    pub insecure_names: Vec<String>,
    pub acl_present: bool,
}

impl SnmpCommunityAudit {
    pub fn compliant(&self) -> bool {
        self.result.satisfied
    }

    pub fn insecure_name_present(&self) -> bool {
        !self.insecure_names.is_empty()
    }
}

/// Classify communities into clean / ACL-restricted and score them
pub fn snmp_community<S: ConfigSource + ?Sized>(
    src: &S,
    rule: &SnmpCommunityRule,
) -> SnmpCommunityAudit {
    let mut clean = Vec::new();
    let mut acl_restricted = Vec::new();
    let mut insecure_names = Vec::new();
    let mut evidence = Vec::new();

    for line in src.find_lines(&rule.pattern) {
        let Some(caps) = rule.pattern.captures(&line.text) else {
            continue;
        };
        let body = caps
            .get(1)
            .map_or(line.trimmed(), |prefix| line.text[prefix.end()..].trim())
            .to_string();

        if let Some(name) = caps.get(2).map(|m| m.as_str()) {
            if INSECURE_COMMUNITIES.contains(&name.to_lowercase().as_str()) {
                insecure_names.push(name.to_string());
            }
        }
        if caps.get(3).is_some_and(|acl| !acl.as_str().is_empty()) {
            acl_restricted.push(body.clone());
        } else {
            clean.push(body.clone());
        }
        evidence.push(body);
    }

    let insecure = !insecure_names.is_empty();
    let penalty = |base: u32| if insecure { base - COMMUNITY_STEP } else { base };
    let (compliant, acl_present, score) = match (clean.is_empty(), acl_restricted.is_empty()) {
        (true, true) => (true, false, COMMUNITY_MAX_SCORE),
        (true, false) => (true, true, penalty(COMMUNITY_MAX_SCORE)),
        (false, false) => (false, true, penalty(COMMUNITY_STEP)),
        (false, true) => (false, false, 0),
    };

    SnmpCommunityAudit {
        result: RuleResult::scored(score, rule.weight, compliant).with_evidence(evidence),
        clean,
        acl_restricted,
        insecure_names,
        acl_present,
    }
}

/// What the feature auditor checks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnmpFeatureMode {
    /// Presence of `snmp-server trap-source`
    TrapSource,
    /// Presence of `snmp-server enable ...`
    Enable,
    /// Matching lines must not mix secure (v2c/v3) and older versions
    Version,
}

impl SnmpFeatureMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnmpFeatureMode::TrapSource => "trap-source",
            SnmpFeatureMode::Enable => "enable",
            SnmpFeatureMode::Version => "version",
        }
    }
}

impl fmt::Display for SnmpFeatureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SnmpFeatureMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "trap-source" => Ok(SnmpFeatureMode::TrapSource),
            "enable" => Ok(SnmpFeatureMode::Enable),
            "version" => Ok(SnmpFeatureMode::Version),
            other => Err(Error::invalid_parameter(
                "mode",
                format!("unknown SNMP feature '{}' (trap-source, enable, version)", other),
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SnmpFeatureRule {
    pattern: Regex,
    weight: u32,
    mode: SnmpFeatureMode,
}

impl SnmpFeatureRule {
    pub fn new(pattern: &str, weight: u32, mode: SnmpFeatureMode) -> Result<Self> {
        let pattern = rule_pattern("pattern", pattern)?;
        if weight == 0 {
            return Err(Error::invalid_parameter("weight", "must be greater than zero"));
        }
        Ok(Self {
            pattern,
            weight,
            mode,
        })
    }

    pub fn mode(&self) -> SnmpFeatureMode {
        self.mode
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnmpFeatureAudit {
    pub result: RuleResult,
    pub mode: SnmpFeatureMode,
    /// Version mode: lines naming SNMP v2c or v3
    pub secure: Vec<String>,
    /// Version mode: every other matching line
    pub insecure: Vec<String>,
}

impl SnmpFeatureAudit {
    pub fn secure_version_present(&self) -> bool {
        !self.secure.is_empty()
    }
}

pub fn snmp_feature<S: ConfigSource + ?Sized>(
    src: &S,
    rule: &SnmpFeatureRule,
) -> Result<SnmpFeatureAudit> {
    let lines = src.find_lines(&rule.pattern);
    let mut audit = SnmpFeatureAudit {
        result: RuleResult::fail(rule.weight),
        mode: rule.mode,
        secure: Vec::new(),
        insecure: Vec::new(),
    };
    let Some(first) = lines.first() else {
        return Ok(audit);
    };

    match rule.mode {
        SnmpFeatureMode::TrapSource | SnmpFeatureMode::Enable => {
            audit.result = RuleResult::pass(rule.weight).with_evidence([first.trimmed()]);
        }
        SnmpFeatureMode::Version => {
            let secure_version = fixed_pattern(r"\bversion\s+(2c|3)\b")?;
            for line in &lines {
                let body = without_snmp_prefix(line);
                if secure_version.is_match(&line.text) {
                    audit.secure.push(body);
                } else {
                    audit.insecure.push(body);
                }
            }

            let mixed = !audit.secure.is_empty() && !audit.insecure.is_empty();
            let result = if mixed {
                RuleResult::fail(rule.weight)
            } else {
                RuleResult::pass(rule.weight)
            };
            audit.result = result.with_evidence(lines.iter().map(|l| without_snmp_prefix(l)));
        }
    }

    Ok(audit)
}

fn without_snmp_prefix(line: &ParsedLine) -> String {
    let text = line.trimmed();
    text.strip_prefix("snmp-server")
        .map_or(text, str::trim)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ParsedConfig;
    use hvt_common::SnmpConfig;

    fn community_rule() -> SnmpCommunityRule {
        let defaults = SnmpConfig::default();
        SnmpCommunityRule::new(&defaults.community.pattern, defaults.community.weight).unwrap()
    }

    fn audit(text: &str) -> SnmpCommunityAudit {
        snmp_community(&ParsedConfig::parse(text), &community_rule())
    }

    #[test]
    fn test_no_communities() {
        let audit = audit("hostname r1\n");
        assert!(audit.compliant());
        assert!(!audit.acl_present);
        assert_eq!(audit.result.achieved, 6);
    }

    #[test]
    fn test_only_acl_restricted_public() {
        let audit = audit("snmp-server community public RO 10\n");
        assert!(audit.clean.is_empty());
        assert_eq!(audit.acl_restricted, vec!["public RO 10"]);
        assert!(audit.insecure_name_present());
        assert!(audit.compliant());
        assert!(audit.acl_present);
        assert_eq!(audit.result.achieved, 3);
    }

    #[test]
    fn test_only_acl_restricted_private_names() {
        let audit = audit("snmp-server community N0tDefault RO SNMP-ACL\n");
        assert!(audit.compliant());
        assert_eq!(audit.result.achieved, 6);
    }

    #[test]
    fn test_mixed_clean_and_restricted() {
        let audit = audit("snmp-server community s3cret RO 10\nsnmp-server community other RW\n");
        assert!(!audit.compliant());
        assert!(audit.acl_present);
        assert_eq!(audit.clean, vec!["other RW"]);
        assert_eq!(audit.result.achieved, 3);

        let with_public =
            self::audit("snmp-server community s3cret RO 10\nsnmp-server community PUBLIC RO\n");
        assert_eq!(with_public.insecure_names, vec!["PUBLIC"]);
        assert_eq!(with_public.result.achieved, 0);
    }

    #[test]
    fn test_only_clean() {
        let audit = audit("snmp-server community s3cret RO\n");
        assert!(!audit.compliant());
        assert!(!audit.acl_present);
        assert_eq!(audit.result.achieved, 0);
    }

    #[test]
    fn test_ipv6_acl_counts_as_restriction() {
        let audit = audit("snmp-server community public RW ipv6 V6ACL\n");
        assert!(audit.clean.is_empty());
        assert_eq!(audit.acl_restricted, vec!["public RW ipv6 V6ACL"]);
        assert_eq!(audit.insecure_names, vec!["public"]);
        assert!(audit.compliant());
        assert_eq!(audit.result.achieved, 3);

        let audit = self::audit("snmp-server community public RW ipv6 V6ACL 10\n");
        assert_eq!(audit.acl_restricted, vec!["public RW ipv6 V6ACL 10"]);
        assert!(audit.insecure_name_present());
        assert_eq!(audit.result.achieved, 3);

        let audit = self::audit("snmp-server community s3cret RO ipv6 V6ACL\n");
        assert!(audit.compliant());
        assert_eq!(audit.result.achieved, 6);
    }

    #[test]
    fn test_community_rule_validation() {
        assert!(matches!(
            SnmpCommunityRule::new(r"^snmp-server\s+community\s+(\S+)", 6),
            Err(Error::InvalidParameter { ref param, .. }) if param == "pattern"
        ));
        assert!(matches!(
            SnmpCommunityRule::new("", 6),
            Err(Error::InvalidParameter { ref param, .. }) if param == "pattern"
        ));
        assert!(matches!(
            SnmpCommunityRule::new(r"^(a)(b)(c)", 4),
            Err(Error::InvalidParameter { ref param, .. }) if param == "weight"
        ));
    }

    fn feature(text: &str, pattern: &str, mode: SnmpFeatureMode) -> SnmpFeatureAudit {
        let rule = SnmpFeatureRule::new(pattern, 3, mode).unwrap();
        snmp_feature(&ParsedConfig::parse(text), &rule).unwrap()
    }

    #[test]
    fn test_feature_presence_modes() {
        let trap = feature(
            "snmp-server trap-source Loopback0\n",
            r"^snmp-server\s+trap-source",
            SnmpFeatureMode::TrapSource,
        );
        assert!(trap.result.satisfied);
        assert_eq!(trap.result.achieved, 3);
        assert_eq!(trap.result.evidence, vec!["snmp-server trap-source Loopback0"]);

        let enable = feature("hostname r1\n", r"^snmp-server\s+enable", SnmpFeatureMode::Enable);
        assert!(!enable.result.satisfied);
        assert_eq!(enable.result.achieved, 0);
    }

    #[test]
    fn test_feature_version_classes() {
        let pattern = r"^snmp-server\s+host";
        let secure_only = feature(
            "snmp-server host 10.0.0.1 version 2c c0mm\nsnmp-server host 10.0.0.2 version 3 priv user\n",
            pattern,
            SnmpFeatureMode::Version,
        );
        assert!(secure_only.result.satisfied);
        assert_eq!(secure_only.result.achieved, 3);
        assert_eq!(secure_only.secure.len(), 2);
        assert!(secure_only.secure_version_present());

        let insecure_only = feature("snmp-server host 10.0.0.1 c0mm\n", pattern, SnmpFeatureMode::Version);
        assert!(insecure_only.result.satisfied);
        assert!(!insecure_only.secure_version_present());
        assert_eq!(insecure_only.insecure, vec!["host 10.0.0.1 c0mm"]);

        let mixed = feature(
            "snmp-server host 10.0.0.1 version 2c c0mm\nsnmp-server host 10.0.0.9 c0mm\n",
            pattern,
            SnmpFeatureMode::Version,
        );
        assert!(!mixed.result.satisfied);
        assert_eq!(mixed.result.achieved, 0);
    }

    #[test]
    fn test_unknown_feature_mode() {
        assert_eq!("version".parse::<SnmpFeatureMode>().unwrap(), SnmpFeatureMode::Version);
        let err = "traps".parse::<SnmpFeatureMode>().unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { ref param, .. } if param == "mode"));
    }

    #[test]
    fn test_community_is_idempotent() {
        let config = ParsedConfig::parse("snmp-server community public RO 10\n");
        let rule = community_rule();
        assert_eq!(snmp_community(&config, &rule), snmp_community(&config, &rule));
    }
}
