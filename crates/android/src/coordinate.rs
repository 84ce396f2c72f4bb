//! Maven coordinates used as dependency override keys

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static PART: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").unwrap());

/// A `group:artifact` pair
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
}

impl Coordinate {
    /// Parse `group:artifact`
    pub fn parse(key: &str) -> Result<Self, String> {
        let mut parts = key.split(':');
        let (Some(group), Some(artifact), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err("coordinate must have the form group:artifact".to_string());
        };

        check_part("group", group)?;
        check_part("artifact", artifact)?;

        Ok(Self {
            group: group.to_string(),
            artifact: artifact.to_string(),
        })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)
    }
}

fn check_part(name: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{} must not be empty", name));
    }
    if !PART.is_match(value) {
        return Err(format!(
            "{} '{}' may only contain letters, digits, '.', '_' and '-'",
            name, value
        ));
    }
    Ok(())
}

/// Check a forced version string
pub fn check_version(version: &str) -> Result<(), String> {
    if version.is_empty() {
        return Err("forced version must not be empty".to_string());
    }
    if version.chars().any(char::is_whitespace) {
        return Err(format!("forced version '{}' must not contain whitespace", version));
    }
    Ok(())
}

/// Split Gradle's `force("group:artifact:version")` notation
pub fn split_force_notation(notation: &str) -> Result<(Coordinate, String), String> {
    let Some((key, version)) = notation.rsplit_once(':') else {
        return Err(format!("'{}' is not group:artifact:version", notation));
    };
    let coordinate = Coordinate::parse(key)?;
    check_version(version)?;
    Ok((coordinate, version.to_string()))
}
