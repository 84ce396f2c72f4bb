//! Java/Kotlin compatibility levels
//!
//! A level is a semantic version. `MAJOR` and `MAJOR.MINOR` are accepted as
//! shorthand for `MAJOR.0.0` / `MAJOR.MINOR.0`, so `11` and `1.8` are valid.
//! Levels are compared as declared; the Gradle spellings
//! (`JavaVersion.VERSION_11`, `JvmTarget.JVM_1_8`) are translated by the
//! build-script importer, never by the resolver.

use once_cell::sync::Lazy;
use regex::Regex;
use semver::Version;
use serde::{Deserialize, Serialize};

static GRADLE_CONSTANT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:JavaVersion\.VERSION_|JvmTarget\.JVM_|VERSION_|JVM_)(\d+(?:_\d+)?)$").unwrap());
static LEGACY_LEVEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^1\.([1-8])$").unwrap());
static MODERN_LEVEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(9|[1-9]\d)$").unwrap());

/// Source and target compatibility as declared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageCompatibility {
    pub source: String,
    pub target: String,
}

impl LanguageCompatibility {
    /// Both levels pinned to the same value
    pub fn pinned(level: impl Into<String>) -> Self {
        let level = level.into();
        Self {
            source: level.clone(),
            target: level,
        }
    }
}

/// Parse a level as a semantic version, padding missing minor/patch parts
pub fn parse_level(level: &str) -> Option<Version> {
    if level.is_empty() || level.chars().any(char::is_whitespace) {
        return None;
    }
    let split = level.find(['-', '+']).unwrap_or(level.len());
    let (core, suffix) = level.split_at(split);
    let padding = match core.split('.').count() {
        1 => ".0.0",
        2 => ".0",
        _ => "",
    };
    Version::parse(&format!("{}{}{}", core, padding, suffix)).ok()
}

/// Level named by a Gradle expression, as `JavaVersion.toString()` would print it
///
/// `JavaVersion.VERSION_11` gives `11`, `JvmTarget.JVM_1_8` gives `1.8`,
/// `JavaVersion.toVersion("17")` and `"17"` give `17`. Anything else is
/// returned trimmed and left for the resolver to reject.
pub fn gradle_level(expression: &str) -> String {
    let trimmed = expression.trim();
    let bare = trimmed.strip_suffix(".toString()").unwrap_or(trimmed);

    if let Some(c) = GRADLE_CONSTANT.captures(bare) {
        return c[1].replace('_', ".");
    }
    let literal = bare
        .strip_prefix("JavaVersion.toVersion(")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(bare)
        .trim();
    match literal.strip_prefix('"').and_then(|l| l.strip_suffix('"')) {
        Some(inner) => unescape(inner),
        None => literal.to_string(),
    }
}

/// `JavaVersion` expression for a level; the inverse of [`gradle_level`]
pub fn java_version_expression(level: &str) -> String {
    if let Some(c) = LEGACY_LEVEL.captures(level) {
        format!("JavaVersion.VERSION_1_{}", &c[1])
    } else if MODERN_LEVEL.is_match(level) {
        format!("JavaVersion.VERSION_{}", level)
    } else {
        format!("JavaVersion.toVersion({})", quote(level))
    }
}

/// Kotlin `jvmTarget` string expression for a level
pub fn jvm_target_expression(level: &str) -> String {
    if LEGACY_LEVEL.is_match(level) || MODERN_LEVEL.is_match(level) {
        format!("{}.toString()", java_version_expression(level))
    } else {
        quote(level)
    }
}

fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            c => out.push(c),
        }
    }
    out
}
