//! Device auditor - runs the rule catalogue and aggregates the score

use crate::auth;
use crate::checks::{CustomRule, FixedRule};
use crate::snmp::{self, SnmpCommunityRule, SnmpFeatureMode, SnmpFeatureRule};
use crate::source::ConfigSource;
use crate::version::VersionComparator;
use hvt_common::{Config, PatternRuleConfig};
use hvt_core::{
    Device, DeviceKind, Error, Result, RuleCategory, RuleMetadata, RuleResult, Severity,
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Everything the auditor needs besides the device itself: version
/// baselines, SNMP rule parameters and custom rules. Validated once,
/// shared by every device in a run.
#[derive(Debug, Clone)]
pub struct AuditProfile {
    versions: VersionComparator,
    community: SnmpCommunityRule,
    snmp_version: SnmpFeatureRule,
    trap_source: SnmpFeatureRule,
    enable_traps: SnmpFeatureRule,
    custom: Vec<CustomRule>,
}

impl AuditProfile {
    /// Built-in baselines and SNMP parameters, no custom rules
    pub fn builtin() -> Result<Self> {
        Self::from_config(&Config::default())
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let snmp = &config.snmp;
        let feature = |section: &str, cfg: &PatternRuleConfig, mode| {
            SnmpFeatureRule::new(&cfg.pattern, cfg.weight, mode).map_err(|e| scoped(section, e))
        };

        let mut profile = Self {
            versions: VersionComparator::from_config(&config.version)?,
            community: SnmpCommunityRule::new(&snmp.community.pattern, snmp.community.weight)
                .map_err(|e| scoped("snmp.community", e))?,
            snmp_version: feature("snmp.version", &snmp.version, SnmpFeatureMode::Version)?,
            trap_source: feature("snmp.trap_source", &snmp.trap_source, SnmpFeatureMode::TrapSource)?,
            enable_traps: feature("snmp.enable", &snmp.enable, SnmpFeatureMode::Enable)?,
            custom: Vec::new(),
        };

        for rule in &config.rules {
            let custom =
                CustomRule::from_config(rule).map_err(|e| scoped(&format!("rules.{}", rule.name), e))?;
            profile.add_custom_rule(custom)?;
        }

        Ok(profile)
    }

    /// Add a custom rule; names must be unique
    pub fn add_custom_rule(&mut self, rule: CustomRule) -> Result<()> {
        if self.custom.iter().any(|r| r.id() == rule.id()) {
            return Err(Error::invalid_parameter(
                format!("rules.{}.name", rule.id()),
                "duplicate rule name",
            ));
        }
        self.custom.push(rule);
        Ok(())
    }

    pub fn custom_rules(&self) -> &[CustomRule] {
        &self.custom
    }

    /// Fixed rules plus custom rules
    pub fn rule_count(&self) -> usize {
        FixedRule::ALL.len() + self.custom.len()
    }

    pub fn versions(&self) -> &VersionComparator {
        &self.versions
    }
}

/// Prefix the offending parameter with its configuration section
fn scoped(section: &str, err: Error) -> Error {
    match err {
        Error::InvalidParameter { param, message } => Error::InvalidParameter {
            param: format!("{}.{}", section, param),
            message,
        },
        other => other,
    }
}

/// A rule's metadata with its result for one device
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleOutcome {
    pub metadata: RuleMetadata,
    pub result: RuleResult,
}

impl RuleOutcome {
    pub fn passed(&self) -> bool {
        self.result.satisfied
    }
}

/// Points earned and available within one category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryScore {
    pub achieved: u32,
    pub max_score: u32,
}

/// Summary of audit results
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditSummary {
    /// Total rules evaluated
    pub total_rules: usize,
    /// Rules whose condition holds
    pub satisfied: usize,
    /// Rules whose condition does not hold
    pub unsatisfied: usize,
    /// Points earned across all rules
    pub achieved: u32,
    /// Points available across all rules
    pub max_score: u32,
    /// `achieved / max_score` as a percentage; 100 when nothing is scored
    pub score_pct: f64,
    /// Unsatisfied rules by severity
    pub by_severity: BTreeMap<Severity, usize>,
    pub by_category: BTreeMap<RuleCategory, CategoryScore>,
}

impl AuditSummary {
    fn record(&mut self, outcome: &RuleOutcome) {
        let result = &outcome.result;
        self.total_rules += 1;
        if result.satisfied {
            self.satisfied += 1;
        } else {
            self.unsatisfied += 1;
            *self.by_severity.entry(outcome.metadata.severity).or_insert(0) += 1;
        }
        self.achieved += result.achieved;
        self.max_score += result.max_weight;

        let category = self.by_category.entry(outcome.metadata.category).or_default();
        category.achieved += result.achieved;
        category.max_score += result.max_weight;
    }

    fn finish(&mut self) {
        self.score_pct = if self.max_score > 0 {
            (self.achieved as f64 / self.max_score as f64) * 100.0
        } else {
            100.0
        };
    }
}

/// Per-device compliance report, keyed by rule id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceReport {
    pub hostname: String,
    pub kind: DeviceKind,
    pub version: String,
    pub results: BTreeMap<String, RuleOutcome>,
    pub summary: AuditSummary,
}

impl ComplianceReport {
    pub fn outcome(&self, rule: &str) -> Result<&RuleOutcome> {
        self.results.get(rule).ok_or_else(|| Error::RuleNotFound {
            rule: rule.to_string(),
        })
    }

    /// All unsatisfied rules
    pub fn failures(&self) -> Vec<&RuleOutcome> {
        self.results.values().filter(|o| !o.passed()).collect()
    }

    pub fn failures_by_severity(&self, severity: Severity) -> Vec<&RuleOutcome> {
        self.results
            .values()
            .filter(|o| !o.passed() && o.metadata.severity == severity)
            .collect()
    }

    /// Whether the overall score reaches `threshold` percent
    pub fn meets(&self, threshold: f64) -> bool {
        self.summary.score_pct >= threshold
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs every rule of a profile against one device's configuration
pub struct DeviceAuditor<'a, S: ConfigSource + ?Sized> {
    device: &'a Device,
    source: &'a S,
    profile: &'a AuditProfile,
}

impl<'a, S: ConfigSource + ?Sized> DeviceAuditor<'a, S> {
    pub fn new(device: &'a Device, source: &'a S, profile: &'a AuditProfile) -> Self {
        Self {
            device,
            source,
            profile,
        }
    }

    /// Evaluate one fixed rule
    pub fn evaluate(&self, rule: FixedRule) -> Result<RuleResult> {
        let src = self.source;
        let profile = self.profile;

        match rule {
            FixedRule::IosVersion => Ok(profile.versions.compare(&self.device.version)?.to_result()),
            FixedRule::LocalUsers => Ok(auth::local_users(src)?.result),
            FixedRule::AaaNewModel => auth::aaa_new_model(src),
            FixedRule::TacacsServers => auth::tacacs_servers(src),
            FixedRule::TacacsSourceInterface => auth::tacacs_source_interface(src),
            FixedRule::RadiusServers => auth::radius_servers(src),
            FixedRule::RadiusSourceInterface => auth::radius_source_interface(src),
            FixedRule::AaaAuthenticationLogin => auth::authentication_login(src),
            FixedRule::AaaAuthenticationEnable => auth::authentication_enable(src),
            FixedRule::AaaAuthorizationExec => auth::authorization_exec(src),
            FixedRule::VtyLoginAuthentication => Ok(auth::vty_login_authentication(src)?.result),
            FixedRule::AaaAuthorizationCommands => Ok(auth::command_authorization(src)?.result),
            FixedRule::AaaMaxFail => auth::max_fail(src),
            FixedRule::SnmpCommunity => Ok(snmp::snmp_community(src, &profile.community).result),
            FixedRule::SnmpVersion => Ok(snmp::snmp_feature(src, &profile.snmp_version)?.result),
            FixedRule::SnmpTrapSource => Ok(snmp::snmp_feature(src, &profile.trap_source)?.result),
            FixedRule::SnmpEnableTraps => Ok(snmp::snmp_feature(src, &profile.enable_traps)?.result),
        }
    }

    /// Run the fixed catalogue followed by the profile's custom rules
    pub fn run_audit(&self) -> Result<ComplianceReport> {
        let hostname = &self.device.hostname;
        info!(
            "Starting audit of {} ({}, {} rules)",
            hostname,
            self.device.kind,
            self.profile.rule_count()
        );

        let mut results = BTreeMap::new();
        let mut summary = AuditSummary::default();
        let mut record = |outcome: RuleOutcome| {
            debug!(
                "Rule {}: {}/{} (satisfied: {})",
                outcome.metadata.id,
                outcome.result.achieved,
                outcome.result.max_weight,
                outcome.result.satisfied
            );
            if !outcome.passed() && outcome.metadata.severity >= Severity::High {
                warn!(
                    "{}: {} rule '{}' not satisfied",
                    hostname, outcome.metadata.severity, outcome.metadata.id
                );
            }
            summary.record(&outcome);
            results.insert(outcome.metadata.id.clone(), outcome);
        };

        for rule in FixedRule::ALL {
            let result = self.evaluate(rule)?;
            record(RuleOutcome {
                metadata: rule.metadata(),
                result,
            });
        }
        for rule in &self.profile.custom {
            let result = rule.evaluate(self.source)?;
            record(RuleOutcome {
                metadata: rule.metadata().clone(),
                result,
            });
        }
        summary.finish();

        info!(
            "Audit of {} complete: {}/{} points ({:.1}%), {} of {} rules unsatisfied",
            hostname,
            summary.achieved,
            summary.max_score,
            summary.score_pct,
            summary.unsatisfied,
            summary.total_rules
        );

        Ok(ComplianceReport {
            hostname: hostname.clone(),
            kind: self.device.kind,
            version: self.device.version.clone(),
            results,
            summary,
        })
    }
}
