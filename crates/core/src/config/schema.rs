//! Configuration schema definitions

use crate::error::Result;
use crate::validation::Validator;
use serde::{Deserialize, Serialize};

/// Plugins every Flutter Android application module applies
pub const DEFAULT_REQUIRED_PLUGINS: &[&str] =
    &["com.android.application", "dev.flutter.flutter-gradle-plugin"];

/// Shape of a Gradle plugin id (`com.android.application`, `kotlin-android`)
pub const PLUGIN_ID_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9_.-]*$";

/// Output formats understood by the CLI
pub const OUTPUT_FORMATS: &[&str] = &["text", "json"];

/// Log levels accepted by the logging section
pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigSchema {
    /// Check settings against their allowed values
    pub fn validate(&self) -> Result<()> {
        let mut validator = Validator::new()
            .one_of("output.format", &self.output.format, OUTPUT_FORMATS)
            .one_of("logging.level", &self.logging.level, LOG_LEVELS);

        for (i, plugin) in self.resolver.required_plugins.iter().enumerate() {
            let field = format!("resolver.required_plugins[{}]", i);
            validator = validator.required(&field, plugin).pattern(
                &field,
                plugin,
                PLUGIN_ID_PATTERN,
                "a Gradle plugin id",
            );
        }

        validator.validate().to_result()
    }
}

/// Resolution policy settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolverConfig {
    /// Plugin identifiers that must appear in every declaration
    #[serde(default = "default_required_plugins")]
    pub required_plugins: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            required_plugins: default_required_plugins(),
        }
    }
}

fn default_required_plugins() -> Vec<String> {
    DEFAULT_REQUIRED_PLUGINS
        .iter()
        .map(|p| p.to_string())
        .collect()
}

/// Report output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Default output format (`text` or `json`)
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_format() -> String {
    "text".to_string()
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Base log level, raised by `-v` flags and overridden by `RUST_LOG`
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_level() -> String {
    "warn".to_string()
}
