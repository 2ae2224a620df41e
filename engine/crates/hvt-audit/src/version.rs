//! IOS / IOS-XE version freshness

use crate::checks::fixed_pattern;
use hvt_common::VersionConfig;
use hvt_core::{Error, Result, RuleResult};
use serde::Serialize;
use std::fmt;

/// Points awarded for running a release at or above the baseline
pub const VERSION_WEIGHT: u32 = 5;

/// Software family, decided by the major version alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IosFamily {
    #[serde(rename = "IOS")]
    Ios,
    #[serde(rename = "IOS-XE")]
    IosXe,
}

impl IosFamily {
    /// Majors above 15 are IOS-XE (16.x Everest onwards)
    pub fn from_major(major: u32) -> Self {
        if major > 15 {
            IosFamily::IosXe
        } else {
            IosFamily::Ios
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IosFamily::Ios => "IOS",
            IosFamily::IosXe => "IOS-XE",
        }
    }
}

impl fmt::Display for IosFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{major, minor, patch}`; field order gives the tie-break order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct VersionTriplet {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl VersionTriplet {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version string with the grammar its family uses:
    /// IOS `15.2(4)E10`, IOS-XE `17.9.4a`. Anything after the patch is ignored.
    pub fn parse(version: &str) -> Result<(IosFamily, Self)> {
        let version = version.trim();
        let leading = fixed_pattern(r"^(\d+)\.")?;
        let major: u32 = leading
            .captures(version)
            .and_then(|c| c[1].parse().ok())
            .ok_or_else(|| Error::VersionParse(version.to_string()))?;

        let family = IosFamily::from_major(major);
        let grammar = match family {
            IosFamily::IosXe => fixed_pattern(r"^(\d+)\.(\d+)\.(\d+)")?,
            IosFamily::Ios => fixed_pattern(r"^(\d+)\.(\d+)\((\d+)\)")?,
        };
        let caps = grammar
            .captures(version)
            .ok_or_else(|| Error::VersionParse(version.to_string()))?;

        let field = |i: usize| -> Result<u32> {
            caps[i]
                .parse()
                .map_err(|_| Error::VersionParse(version.to_string()))
        };
        Ok((family, Self::new(field(1)?, field(2)?, field(3)?)))
    }
}

impl fmt::Display for VersionTriplet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Outcome of comparing an installed version against its family baseline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionVerdict {
    pub compliant: bool,
    pub family: IosFamily,
    pub installed: VersionTriplet,
    pub baseline: VersionTriplet,
    /// 0 or `VERSION_WEIGHT`
    pub achieved: u32,
}

impl VersionVerdict {
    pub fn to_result(&self) -> RuleResult {
        let result = if self.compliant {
            RuleResult::pass(VERSION_WEIGHT)
        } else {
            RuleResult::fail(VERSION_WEIGHT)
        };
        result.with_evidence([
            self.family.to_string(),
            format!("installed {} / baseline {}", self.installed, self.baseline),
        ])
    }
}

/// Compares installed versions against per-family minimums
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionComparator {
    ios: VersionTriplet,
    iosxe: VersionTriplet,
}

impl Default for VersionComparator {
    fn default() -> Self {
        Self {
            ios: VersionTriplet::new(12, 4, 6),
            iosxe: VersionTriplet::new(16, 6, 4),
        }
    }
}

impl VersionComparator {
    pub fn new(ios: VersionTriplet, iosxe: VersionTriplet) -> Self {
        Self { ios, iosxe }
    }

    /// Baselines from the `[version]` section; each must parse in its own family
    pub fn from_config(config: &VersionConfig) -> Result<Self> {
        let ios = baseline("version.ios_baseline", &config.ios_baseline, IosFamily::Ios)?;
        let iosxe = baseline(
            "version.iosxe_baseline",
            &config.iosxe_baseline,
            IosFamily::IosXe,
        )?;
        Ok(Self::new(ios, iosxe))
    }

    pub fn baseline(&self, family: IosFamily) -> VersionTriplet {
        match family {
            IosFamily::Ios => self.ios,
            IosFamily::IosXe => self.iosxe,
        }
    }

    /// Compliant when major, then minor, then patch is at or above the baseline
    pub fn compare(&self, installed: &str) -> Result<VersionVerdict> {
        let (family, triplet) = VersionTriplet::parse(installed)?;
        let baseline = self.baseline(family);
        let compliant = triplet >= baseline;

        Ok(VersionVerdict {
            compliant,
            family,
            installed: triplet,
            baseline,
            achieved: if compliant { VERSION_WEIGHT } else { 0 },
        })
    }
}

/// Compare against the built-in baselines: IOS 12.4(6), IOS-XE 16.6.4
pub fn compare(installed: &str) -> Result<VersionVerdict> {
    VersionComparator::default().compare(installed)
}

fn baseline(key: &str, value: &str, expected: IosFamily) -> Result<VersionTriplet> {
    let invalid = |message: String| Error::InvalidConfig {
        key: key.to_string(),
        message,
    };
    let (family, triplet) = VersionTriplet::parse(value).map_err(|e| invalid(e.to_string()))?;
    if family != expected {
        return Err(invalid(format!("{} is not an {} version", value, expected)));
    }
    Ok(triplet)
}
