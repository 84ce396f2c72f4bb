//! Fluent field validation
//!
//! Collects every problem with a set of fields instead of stopping at the
//! first one. Used for tool configuration and for non-blocking warnings on
//! resolved build configurations.
//!
//! # Example
//!
//! ```rust
//! use droidcfg_core::validation::Validator;
//!
//! let result = Validator::new()
//!     .required("output.format", "json")
//!     .one_of("output.format", "json", &["text", "json"])
//!     .validate();
//!
//! assert!(result.is_valid());
//! ```

use crate::error::{Error, ErrorCode, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Validation error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field that failed validation
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
    /// Expected value (if applicable)
    pub expected: Option<String>,
    /// Actual value (if applicable)
    pub actual: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationError>,
}

impl ValidationResult {
    /// Create a new empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get all errors
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Get all warnings
    pub fn warnings(&self) -> &[ValidationError] {
        &self.warnings
    }

    /// Add an error
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: ValidationError) {
        self.warnings.push(warning);
    }

    /// Convert to Result type
    pub fn to_result(self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            let messages: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
            let mut err = Error::new(
                ErrorCode::ValidationError,
                format!("Validation failed: {}", messages.join("; ")),
            );
            if let Some(first) = self.errors.first() {
                err = err.with_field(first.field.clone());
            }
            Err(err)
        }
    }
}

/// Fluent validator builder
pub struct Validator {
    result: ValidationResult,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self {
            result: ValidationResult::new(),
        }
    }

    /// Validate that a field is not empty
    pub fn required(mut self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: "Field is required".to_string(),
                code: "REQUIRED".to_string(),
                expected: Some("non-empty value".to_string()),
                actual: Some("empty".to_string()),
            });
        }
        self
    }

    /// Validate against a regex pattern
    pub fn pattern(mut self, field: &str, value: &str, pattern: &str, description: &str) -> Self {
        match Regex::new(pattern) {
            Ok(re) => {
                if !re.is_match(value) {
                    self.result.add_error(ValidationError {
                        field: field.to_string(),
                        message: format!("Must match {}", description),
                        code: "PATTERN".to_string(),
                        expected: Some(description.to_string()),
                        actual: Some(value.to_string()),
                    });
                }
            }
            Err(_) => {
                self.result.add_error(ValidationError {
                    field: field.to_string(),
                    message: "Invalid validation pattern".to_string(),
                    code: "INTERNAL".to_string(),
                    expected: None,
                    actual: None,
                });
            }
        }
        self
    }

    /// Validate that a value is in a list of allowed values
    pub fn one_of(mut self, field: &str, value: &str, allowed: &[&str]) -> Self {
        if !allowed.contains(&value) {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: format!("Must be one of: {}", allowed.join(", ")),
                code: "ONE_OF".to_string(),
                expected: Some(allowed.join(", ")),
                actual: Some(value.to_string()),
            });
        }
        self
    }

    /// Add a warning (non-blocking)
    pub fn warn_if(mut self, field: &str, condition: bool, message: &str) -> Self {
        if condition {
            self.result.add_warning(ValidationError {
                field: field.to_string(),
                message: message.to_string(),
                code: "WARNING".to_string(),
                expected: None,
                actual: None,
            });
        }
        self
    }

    /// Complete validation and return result
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}
