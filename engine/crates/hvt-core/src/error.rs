//! Error types for HVT

use thiserror::Error;

/// Result type alias using the HVT Error
pub type Result<T> = std::result::Result<T, Error>;

/// HVT error types
#[derive(Error, Debug)]
pub enum Error {
    // === Rule Errors ===
    #[error("Invalid rule parameter {param}: {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Rule not found: {rule}")]
    RuleNotFound { rule: String },

    // === Evaluation Errors ===
    #[error("Unrecognized IOS version: {0}")]
    VersionParse(String),

    #[error("Parse error: {0}")]
    Parse(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidConfig { key: String, message: String },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Running configuration not found: {path}")]
    FileNotFound { path: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic ===
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for a rule parameter validation failure
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Check if this error is fatal (should stop the whole run, not just one device)
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Configuration(_)
                | Error::InvalidConfig { .. }
                | Error::InvalidParameter { .. }
                | Error::Internal(_)
        )
    }

    /// Get an error code for logging
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidParameter { .. } => "INVALID_PARAMETER",
            Error::RuleNotFound { .. } => "RULE_NOT_FOUND",
            Error::VersionParse(_) => "VERSION_PARSE",
            Error::Parse(_) => "PARSE_ERROR",
            Error::Configuration(_) => "CONFIG_ERROR",
            Error::InvalidConfig { .. } => "INVALID_CONFIG",
            Error::Io(_) => "IO_ERROR",
            Error::FileNotFound { .. } => "FILE_NOT_FOUND",
            Error::Json(_) => "JSON_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
            Error::Other(_) => "OTHER",
        }
    }
}
