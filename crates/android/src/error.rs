//! Resolution errors
//!
//! Every kind is a local validation failure detected before any build step
//! runs. None is retried and none produces a partial result.

use droidcfg_core::error::{Error, ErrorCode};
use thiserror::Error;

/// Result type alias for resolution
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Reasons a declaration cannot be resolved into a `BuildConfig`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required plugin is absent from the declared set
    #[error("required plugin '{plugin}' is not applied")]
    MissingPlugin { plugin: String },

    /// `1 <= minSdkVersion <= targetSdkVersion <= compileSdkVersion` does not hold
    #[error(
        "{field}: expected 1 <= minSdkVersion ({min_sdk}) <= targetSdkVersion ({target_sdk}) <= compileSdkVersion ({compile_sdk})"
    )]
    SdkRange {
        field: &'static str,
        min_sdk: u32,
        target_sdk: u32,
        compile_sdk: u32,
    },

    /// Compatibility levels differ or cannot be parsed
    #[error("{field}: {reason}")]
    CompatibilityMismatch { field: String, reason: String },

    /// A signing assignment references an undeclared signing config
    #[error(
        "signingAssignment.{variant}: signing config '{signing_config}' is not declared (known: {})",
        known.join(", ")
    )]
    UnknownSigningConfig {
        variant: String,
        signing_config: String,
        known: Vec<String>,
    },

    /// Malformed override coordinate or version
    #[error("dependencyOverrides[\"{coordinate}\"]: {reason}")]
    InvalidDependencyOverride { coordinate: String, reason: String },

    /// Malformed `applicationId` or `namespace`
    #[error("{field}: '{value}' {reason}")]
    InvalidIdentifier {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// Any other field with a simple non-empty or range constraint
    #[error("{field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl ConfigError {
    /// Stable kind name, as printed by the CLI
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingPlugin { .. } => "MissingPluginError",
            Self::SdkRange { .. } => "SdkRangeError",
            Self::CompatibilityMismatch { .. } => "CompatibilityMismatchError",
            Self::UnknownSigningConfig { .. } => "UnknownSigningConfigError",
            Self::InvalidDependencyOverride { .. } => "InvalidDependencyOverrideError",
            Self::InvalidIdentifier { .. } => "InvalidIdentifierError",
            Self::InvalidField { .. } => "InvalidFieldError",
        }
    }

    /// Name of the offending field
    pub fn field(&self) -> String {
        match self {
            Self::MissingPlugin { .. } => "plugins".to_string(),
            Self::SdkRange { field, .. } => (*field).to_string(),
            Self::CompatibilityMismatch { field, .. } => field.clone(),
            Self::UnknownSigningConfig { variant, .. } => format!("signingAssignment.{}", variant),
            Self::InvalidDependencyOverride { coordinate, .. } => {
                format!("dependencyOverrides[\"{}\"]", coordinate)
            }
            Self::InvalidIdentifier { field, .. } | Self::InvalidField { field, .. } => {
                (*field).to_string()
            }
        }
    }

    /// Error code shared with the rest of the toolchain
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingPlugin { .. } => ErrorCode::MissingPlugin,
            Self::SdkRange { .. } => ErrorCode::SdkRange,
            Self::CompatibilityMismatch { .. } => ErrorCode::CompatibilityMismatch,
            Self::UnknownSigningConfig { .. } => ErrorCode::UnknownSigningConfig,
            Self::InvalidDependencyOverride { .. } => ErrorCode::InvalidDependencyOverride,
            Self::InvalidIdentifier { .. } => ErrorCode::InvalidIdentifier,
            Self::InvalidField { .. } => ErrorCode::InvalidField,
        }
    }

    /// Process exit code for this kind
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Self::MissingPlugin { plugin } => {
                Some(format!("Add id(\"{}\") to the plugins block", plugin))
            }
            Self::UnknownSigningConfig { signing_config, .. } => Some(format!(
                "Declare '{}' under signingConfigs or assign an existing config",
                signing_config
            )),
            Self::InvalidDependencyOverride { .. } => {
                Some("Use the form \"group:artifact\" = \"version\"".to_string())
            }
            _ => None,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        let mut out = Error::new(err.code(), format!("{}: {}", err.kind(), err))
            .with_field(err.field());
        if let Some(suggestion) = err.suggestion() {
            out = out.with_suggestion(suggestion);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use droidcfg_core::error::exit_codes;

    #[test]
    fn test_sdk_range_message_names_all_levels() {
        let err = ConfigError::SdkRange {
            field: "minSdkVersion",
            min_sdk: 35,
            target_sdk: 21,
            compile_sdk: 35,
        };
        let msg = err.to_string();
        assert!(msg.contains("minSdkVersion (35)"));
        assert!(msg.contains("targetSdkVersion (21)"));
        assert_eq!(err.kind(), "SdkRangeError");
        assert_eq!(err.exit_code(), exit_codes::SDK_RANGE);
    }

    #[test]
    fn test_unknown_signing_config_field() {
        let err = ConfigError::UnknownSigningConfig {
            variant: "release".to_string(),
            signing_config: "prod".to_string(),
            known: vec!["debug".to_string()],
        };
        assert_eq!(err.field(), "signingAssignment.release");
        assert!(err.to_string().contains("known: debug"));
    }

    #[test]
    fn test_conversion_into_core_error() {
        let err: Error = ConfigError::MissingPlugin {
            plugin: "dev.flutter.flutter-gradle-plugin".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::MissingPlugin);
        assert_eq!(err.field.as_deref(), Some("plugins"));
        assert!(err.message.starts_with("MissingPluginError: "));
        assert!(err.suggestion.unwrap().contains("id(\"dev.flutter.flutter-gradle-plugin\")"));
    }
}
