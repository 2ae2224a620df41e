//! Parameterised `objects` / `typed` evaluators for declarative rules

use crate::checks::rule_pattern;
use crate::source::ConfigSource;
use hvt_core::{Error, Result, RuleResult};
use regex::Regex;

/// Values longer than this are treated like the default
const TYPED_VALUE_MAX_LEN: usize = 5;

/// Presence rule: does any top-level line match?
#[derive(Debug, Clone)]
pub struct ObjectsRule {
    pattern: Regex,
    weight: u32,
    negate: bool,
}

impl ObjectsRule {
    pub fn new(pattern: &str, weight: u32, negate: bool) -> Result<Self> {
        Ok(Self {
            pattern: rule_pattern("pattern", pattern)?,
            weight: nonzero_weight(weight)?,
            negate,
        })
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }
}

/// Score a presence rule.
///
/// | matches | negate | satisfied | achieved |
/// |---------|--------|-----------|----------|
/// | no      | true   | false     | 0        |
/// | no      | false  | false     | weight   |
/// | yes     | true   | true      | weight   |
/// | yes     | false  | false     | 0        |
///
/// The second row keeps its points while unsatisfied; it is the one
/// outcome that departs from "unsatisfied scores zero".
pub fn objects<S: ConfigSource + ?Sized>(src: &S, rule: &ObjectsRule) -> RuleResult {
    let lines = src.find_lines(&rule.pattern);
    let w = rule.weight;
    let result = match (lines.is_empty(), rule.negate) {
        (false, true) => RuleResult::pass(w),
        (true, false) => RuleResult::scored(w, w, false),
        _ => RuleResult::fail(w),
    };
    result.with_evidence(lines.iter().map(|line| line.trimmed()))
}

/// Single-value rule: first capture of the first match, or a default
#[derive(Debug, Clone)]
pub struct TypedRule {
    pattern: Regex,
    default: String,
    weight: u32,
    negate: bool,
}

impl TypedRule {
    pub fn new(pattern: &str, default: &str, weight: u32, negate: bool) -> Result<Self> {
        let pattern = rule_pattern("pattern", pattern)?;
        if default.is_empty() {
            return Err(Error::invalid_parameter("default", "must not be empty"));
        }
        Ok(Self {
            pattern,
            default: default.to_string(),
            weight: nonzero_weight(weight)?,
            negate,
        })
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }
}

/// Score a single-value rule.
///
/// A value that is empty or longer than five characters is default-like and
/// passes iff `negate` is false. Any other value must be a boolean literal;
/// it passes iff both the value and `negate` are true.
pub fn typed<S: ConfigSource + ?Sized>(src: &S, rule: &TypedRule) -> Result<RuleResult> {
    let value = src.find_first_typed(&rule.pattern, &rule.default);
    let passed = if value.is_empty() || value.len() > TYPED_VALUE_MAX_LEN {
        !rule.negate
    } else {
        parse_flag(&value)? && rule.negate
    };

    let result = if passed {
        RuleResult::pass(rule.weight)
    } else {
        RuleResult::fail(rule.weight)
    };
    Ok(result.with_evidence([value]))
}

/// Strict boolean literal: `true`/`false` in any case, or an integer
/// (non-zero is true)
pub fn parse_flag(value: &str) -> Result<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        return Ok(true);
    }
    if value.eq_ignore_ascii_case("false") {
        return Ok(false);
    }
    value
        .parse::<i64>()
        .map(|n| n != 0)
        .map_err(|_| Error::Parse(format!("'{}' is not a boolean literal", value)))
}

fn nonzero_weight(weight: u32) -> Result<u32> {
    if weight == 0 {
        return Err(Error::invalid_parameter("weight", "must be greater than zero"));
    }
    Ok(weight)
}
