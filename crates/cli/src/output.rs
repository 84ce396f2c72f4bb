//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use droidcfg_core::error::Error;
use droidcfg_core::validation::ValidationError;
use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print an aligned `label  value` row
    pub fn row(label: &str, value: &str) {
        println!("  {:<26} {}", label.dimmed(), value);
    }
}

/// Print a structured error with its field, context and suggestion
pub fn print_error(err: &Error) {
    Status::error(&format!("{} {}", err.code.to_string().bold(), err.message));
    if let Some(field) = &err.field {
        eprintln!("    field: {}", field.cyan());
    }
    if let Some(context) = &err.context {
        eprintln!("    context: {}", context);
    }
    if let Some(suggestion) = &err.suggestion {
        eprintln!("    {} {}", "hint:".yellow(), suggestion);
    }
}

/// Print non-blocking validation warnings
pub fn print_warnings(warnings: &[ValidationError]) {
    for warning in warnings {
        Status::warning(&format_warning(warning));
    }
}

/// One-line rendering of a warning
pub fn format_warning(warning: &ValidationError) -> String {
    format!("{}: {}", warning.field, warning.message)
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
