//! Dotted package identifiers (`applicationId`, `namespace`)

use once_cell::sync::Lazy;
use regex::Regex;

static SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap());

/// Java keywords and literals that cannot appear as a package segment
const RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "void", "volatile", "while",
];

/// Check a dotted identifier, returning the violated constraint on failure
///
/// The identifier needs at least two segments. Each segment starts with an
/// ASCII letter, continues with letters, digits or underscores, and is not a
/// Java reserved word.
pub fn check_dotted_identifier(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("must not be empty".to_string());
    }

    let segments: Vec<&str> = value.split('.').collect();
    if segments.len() < 2 {
        return Err("must contain at least two dot-separated segments".to_string());
    }

    for segment in segments {
        if segment.is_empty() {
            return Err("must not contain empty segments".to_string());
        }
        if !SEGMENT.is_match(segment) {
            return Err(format!(
                "has invalid segment '{}' (expected a letter followed by letters, digits or '_')",
                segment
            ));
        }
        if RESERVED.contains(&segment) {
            return Err(format!("uses reserved word '{}' as a segment", segment));
        }
    }

    Ok(())
}

/// Whether `value` is a valid dotted identifier
pub fn is_dotted_identifier(value: &str) -> bool {
    check_dotted_identifier(value).is_ok()
}
