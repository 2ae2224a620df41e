//! HVT Core - Foundation types and error handling
//!
//! This crate provides the core abstractions shared by the HVT crates:
//! - `RuleResult`: points, verdict and evidence produced by a hardening rule
//! - `RuleMetadata`: catalogue entry describing a rule
//! - `Device`, `DeviceKind`: inventory data for an audited device
//! - `Severity`, `RuleCategory`: core enums

pub mod device;
pub mod error;
pub mod rule;
pub mod severity;

// Re-export commonly used types at crate root
pub use device::{Device, DeviceKind, RUNNING_CONFIG_SUFFIX};
pub use error::{Error, Result};
pub use rule::{RuleMetadata, RuleResult};
pub use severity::{RuleCategory, Severity};
