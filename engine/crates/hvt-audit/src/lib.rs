//! HVT Audit - hardening audit of Cisco IOS / IOS-XE running configurations
//!
//! This crate scores a device configuration against a fixed rule set:
//! - Software version against per-family baselines
//! - Local accounts, AAA model, TACACS+ / RADIUS servers and source interfaces
//! - Authentication / authorization method lists, VTY login, command authorization
//! - SNMP community hygiene and notification features
//!
//! plus declarative `objects` / `typed` rules supplied in configuration.
//!
//! # Example
//!
//! ```no_run
//! use hvt_audit::{AuditProfile, DeviceAuditor, ParsedConfig};
//! use hvt_core::{Device, DeviceKind};
//!
//! let device = Device::new("edge-r1", DeviceKind::Router, "15.2(4)M11");
//! let config = ParsedConfig::load("./repo", &device, "_sh_run.cfg")?;
//! let profile = AuditProfile::builtin()?;
//!
//! let report = DeviceAuditor::new(&device, &config, &profile).run_audit()?;
//! println!("Score: {:.1}%", report.summary.score_pct);
//!
//! for failure in report.failures() {
//!     println!("{} ({})", failure.metadata.id, failure.metadata.severity);
//! }
//! # Ok::<(), hvt_core::Error>(())
//! ```

pub mod auditor;
pub mod auth;
pub mod checks;
pub mod generic;
pub mod snmp;
pub mod source;
pub mod version;

pub use auditor::{
    AuditProfile, AuditSummary, CategoryScore, ComplianceReport, DeviceAuditor, RuleOutcome,
};
pub use auth::{
    AuthMethod, CommandAuthorizationAudit, CommandAuthorizationRule, LocalUser, LocalUserAudit,
    VtyAuthAudit, VtyRangeAuth,
};
pub use checks::{CustomRule, CustomRuleKind, FixedRule};
pub use generic::{objects, typed, ObjectsRule, TypedRule};
pub use snmp::{
    snmp_community, snmp_feature, SnmpCommunityAudit, SnmpCommunityRule, SnmpFeatureAudit,
    SnmpFeatureMode, SnmpFeatureRule,
};
pub use source::{ConfigSource, ParsedConfig, ParsedLine};
pub use version::{IosFamily, VersionComparator, VersionTriplet, VersionVerdict};
