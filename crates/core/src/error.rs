//! Structured error handling with codes, context and recovery suggestions
//!
//! Every failure surfaced by droidcfg carries:
//! - A stable error code for programmatic handling
//! - Optional context and a recovery suggestion
//! - A serializable report for `--format json` output

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // General errors (1xxx)
    Unknown = 1000,
    Internal = 1001,

    // IO errors (2xxx)
    IoError = 2000,
    FileNotFound = 2001,
    PermissionDenied = 2002,

    // Configuration errors (3xxx)
    ConfigError = 3000,
    ConfigNotFound = 3001,
    ConfigParseError = 3002,
    UnsupportedFormat = 3003,
    ReleaseMetadataError = 3004,

    // Validation errors (6xxx)
    ValidationError = 6000,

    // Build configuration resolution (61xx)
    SdkRange = 6101,
    CompatibilityMismatch = 6102,
    UnknownSigningConfig = 6103,
    InvalidDependencyOverride = 6104,
    InvalidIdentifier = 6105,
    MissingPlugin = 6106,
    InvalidField = 6107,

    // Platform-specific errors (8xxx)
    GradleError = 8002,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "General",
            2 => "IO",
            3 => "Configuration",
            6 => "Validation",
            8 => "Platform",
            _ => "Unknown",
        }
    }

    /// Process exit code the CLI reports for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SdkRange => exit_codes::SDK_RANGE,
            Self::CompatibilityMismatch => exit_codes::COMPATIBILITY_MISMATCH,
            Self::UnknownSigningConfig => exit_codes::UNKNOWN_SIGNING_CONFIG,
            Self::InvalidDependencyOverride => exit_codes::INVALID_DEPENDENCY_OVERRIDE,
            Self::InvalidIdentifier => exit_codes::INVALID_IDENTIFIER,
            Self::MissingPlugin => exit_codes::MISSING_PLUGIN,
            Self::InvalidField => exit_codes::INVALID_FIELD,
            Self::ValidationError => exit_codes::VALIDATION_ERROR,
            Self::ConfigError
            | Self::ConfigNotFound
            | Self::ConfigParseError
            | Self::UnsupportedFormat
            | Self::ReleaseMetadataError
            | Self::IoError
            | Self::FileNotFound
            | Self::PermissionDenied
            | Self::GradleError => exit_codes::CONFIG_ERROR,
            Self::Unknown | Self::Internal => exit_codes::FAILURE,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Offending field, when the error is about one
    pub field: Option<String>,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {}", ctx)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Name the field the error is about
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Exit code the CLI should terminate with
    pub fn exit_code(&self) -> i32 {
        self.code.exit_code()
    }

    /// Convert to a serializable report
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            code_str: self.code.to_string(),
            category: self.code.category().to_string(),
            message: self.message.clone(),
            field: self.field.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(|e| e.to_string()),
        }
    }

    // Convenience constructors

    pub fn config_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a .droidcfg.toml file or use --config to specify a path")
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigParseError, message)
    }

    pub fn unsupported_format(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::UnsupportedFormat,
            format!(
                "Unsupported declaration format: {}",
                path.as_ref().display()
            ),
        )
        .with_suggestion("Use a .toml, .json or .gradle.kts declaration")
    }

    pub fn release_metadata(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ReleaseMetadataError, message)
            .with_suggestion("Pass --version-code/--version-name, --pubspec or --local-properties")
    }

    pub fn gradle(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::GradleError, message)
    }
}

/// Serializable error report for logging and JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub code_str: String,
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const VALIDATION_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;

    // One code per resolution error kind
    pub const SDK_RANGE: i32 = 10;
    pub const COMPATIBILITY_MISMATCH: i32 = 11;
    pub const UNKNOWN_SIGNING_CONFIG: i32 = 12;
    pub const INVALID_DEPENDENCY_OVERRIDE: i32 = 13;
    pub const INVALID_IDENTIFIER: i32 = 14;
    pub const MISSING_PLUGIN: i32 = 15;
    pub const INVALID_FIELD: i32 = 16;
}

// Implement From for common error types

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("JSON parse error: {}", err))
            .with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {}", err))
            .with_source(err)
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::new(ErrorCode::Internal, format!("TOML serialize error: {}", err))
            .with_source(err)
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_suggestion(suggestion))
    }
}
