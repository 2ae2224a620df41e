//! Severity levels and rule categories

use serde::{Deserialize, Serialize};

/// Severity of a failed hardening rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, no direct exposure
    #[default]
    Info,
    /// Low severity, minimal risk
    Low,
    /// Medium severity, moderate risk
    Medium,
    /// High severity, significant risk
    High,
    /// Critical severity, immediate action required
    Critical,
}

impl Severity {
    /// Derive a severity from a rule weight (points at stake)
    pub fn from_weight(weight: u32) -> Self {
        match weight {
            w if w >= 6 => Severity::Critical,
            w if w >= 5 => Severity::High,
            w if w >= 3 => Severity::Medium,
            w if w >= 1 => Severity::Low,
            _ => Severity::Info,
        }
    }

    /// Get display string
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Area of the hardening policy a rule belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// Operating system version freshness
    Software,
    /// Local accounts and privilege levels
    Accounts,
    /// AAA model, servers and method lists
    Aaa,
    /// Remote management lines (VTY)
    Management,
    /// SNMP communities and features
    Snmp,
    /// Caller-defined declarative rules
    Custom,
}

impl RuleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCategory::Software => "software",
            RuleCategory::Accounts => "accounts",
            RuleCategory::Aaa => "aaa",
            RuleCategory::Management => "management",
            RuleCategory::Snmp => "snmp",
            RuleCategory::Custom => "custom",
        }
    }
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
