//! Rule metadata and results - what every hardening rule reports back

use crate::severity::{RuleCategory, Severity};
use serde::{Deserialize, Serialize};

/// Outcome of evaluating one rule against one configuration snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleResult {
    /// Points awarded
    pub achieved: u32,
    /// Points available for this rule
    pub max_weight: u32,
    /// Whether the rule's condition holds
    pub satisfied: bool,
    /// Matched tokens or lines, in configuration order
    #[serde(default)]
    pub evidence: Vec<String>,
}

impl RuleResult {
    /// Full marks
    pub fn pass(max_weight: u32) -> Self {
        Self {
            achieved: max_weight,
            max_weight,
            satisfied: true,
            evidence: Vec::new(),
        }
    }

    /// Zero points
    pub fn fail(max_weight: u32) -> Self {
        Self {
            achieved: 0,
            max_weight,
            satisfied: false,
            evidence: Vec::new(),
        }
    }

    /// Arbitrary score; `achieved` is capped at `max_weight`
    pub fn scored(achieved: u32, max_weight: u32, satisfied: bool) -> Self {
        Self {
            achieved: achieved.min(max_weight),
            max_weight,
            satisfied,
            evidence: Vec::new(),
        }
    }

    pub fn with_evidence<I, S>(mut self, evidence: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.evidence = evidence.into_iter().map(Into::into).collect();
        self
    }

    /// True when the rule earned every available point
    pub fn is_full_score(&self) -> bool {
        self.achieved == self.max_weight
    }
}

/// Static description of a rule in the audit catalogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMetadata {
    /// Stable rule key used in reports (e.g. "aaa_authentication_login")
    pub id: String,
    /// Human-readable name
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: RuleCategory,
    /// Severity reported when the rule is not satisfied
    pub severity: Severity,
    /// Remediation hint for failed rules
    #[serde(default)]
    pub remediation: Option<String>,
}

impl RuleMetadata {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: RuleCategory,
        severity: Severity,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category,
            severity,
            remediation: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn with_remediation(mut self, remediation: impl Into<String>) -> Self {
        self.remediation = Some(remediation.into());
        self
    }
}
