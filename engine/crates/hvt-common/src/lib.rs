//! HVT Common - Shared utilities: configuration and logging
//!
//! This crate provides common functionality used across the HVT crates.

pub mod config;
pub mod logging;

pub use config::{
    AuditConfig, Config, ConfigBuilder, CustomRuleConfig, EvaluatorKind, LoggingConfig,
    NegateFlag, PatternRuleConfig, SnmpConfig, VersionConfig,
};
pub use logging::{init_logging, init_logging_with_config, LogConfig, LogFormat};
