//! Release metadata (`versionCode` / `versionName`)
//!
//! The version pair is supplied from outside the declaration, normally by
//! the Flutter tool through `pubspec.yaml` or `local.properties`. Providers
//! do the I/O so that resolution itself stays pure.

use droidcfg_core::error::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Versions used by the Flutter Gradle plugin when `local.properties` has none
pub const FLUTTER_DEFAULT_VERSION_CODE: u32 = 1;
pub const FLUTTER_DEFAULT_VERSION_NAME: &str = "1.0";

/// Externally supplied version information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseMetadata {
    pub version_code: u32,
    pub version_name: String,
}

impl ReleaseMetadata {
    pub fn new(version_code: u32, version_name: impl Into<String>) -> Self {
        Self {
            version_code,
            version_name: version_name.into(),
        }
    }
}

/// Source of release metadata
pub trait ReleaseMetadataProvider {
    /// Short description used in logs and error context
    fn describe(&self) -> String;

    /// Produce the version pair
    fn release_metadata(&self) -> Result<ReleaseMetadata>;
}

/// Metadata given explicitly, e.g. on the command line
#[derive(Debug, Clone)]
pub struct FixedMetadata(pub ReleaseMetadata);

impl ReleaseMetadataProvider for FixedMetadata {
    fn describe(&self) -> String {
        "command line".to_string()
    }

    fn release_metadata(&self) -> Result<ReleaseMetadata> {
        Ok(self.0.clone())
    }
}

/// Metadata read from the `version:` key of `pubspec.yaml`
#[derive(Debug, Clone)]
pub struct PubspecMetadata {
    pub path: PathBuf,
}

#[derive(Deserialize)]
struct Pubspec {
    version: Option<serde_yaml::Value>,
}

impl PubspecMetadata {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse pubspec content; `1.2.3+45` yields name `1.2.3` and code `45`
    pub fn parse(content: &str) -> Result<ReleaseMetadata> {
        let pubspec: Pubspec = serde_yaml::from_str(content)
            .map_err(|e| Error::parse(format!("YAML parse error: {}", e)).with_source(e))?;

        let version = match pubspec.version {
            Some(serde_yaml::Value::String(s)) => s,
            Some(serde_yaml::Value::Number(n)) => n.to_string(),
            Some(_) => {
                return Err(Error::release_metadata("pubspec version must be a string")
                    .with_field("version"));
            }
            None => {
                return Err(Error::release_metadata("pubspec.yaml declares no version")
                    .with_field("version"));
            }
        };

        parse_flutter_version(&version)
    }
}

impl ReleaseMetadataProvider for PubspecMetadata {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn release_metadata(&self) -> Result<ReleaseMetadata> {
        let content = read(&self.path)?;
        Self::parse(&content).context(format!("In {}", self.path.display()))
    }
}

/// Split a Flutter `name+code` version string
pub fn parse_flutter_version(version: &str) -> Result<ReleaseMetadata> {
    let version = version.trim();
    let (name, code) = match version.split_once('+') {
        Some((name, code)) => {
            let code = code.parse::<u32>().map_err(|_| {
                Error::release_metadata(format!("build number '{}' is not an integer", code))
                    .with_field("versionCode")
            })?;
            (name, code)
        }
        None => (version, FLUTTER_DEFAULT_VERSION_CODE),
    };

    Ok(ReleaseMetadata::new(code, name))
}

/// Metadata read from `flutter.versionCode` / `flutter.versionName` in `local.properties`
#[derive(Debug, Clone)]
pub struct LocalPropertiesMetadata {
    pub path: PathBuf,
}

impl LocalPropertiesMetadata {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse properties content, falling back to Flutter's defaults
    pub fn parse(content: &str) -> Result<ReleaseMetadata> {
        let props = parse_properties(content);

        let version_code = match props.get("flutter.versionCode") {
            Some(raw) => raw.parse::<u32>().map_err(|_| {
                Error::release_metadata(format!("flutter.versionCode '{}' is not an integer", raw))
                    .with_field("versionCode")
            })?,
            None => FLUTTER_DEFAULT_VERSION_CODE,
        };
        let version_name = props
            .get("flutter.versionName")
            .cloned()
            .unwrap_or_else(|| FLUTTER_DEFAULT_VERSION_NAME.to_string());

        Ok(ReleaseMetadata::new(version_code, version_name))
    }
}

impl ReleaseMetadataProvider for LocalPropertiesMetadata {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn release_metadata(&self) -> Result<ReleaseMetadata> {
        let content = read(&self.path)?;
        Self::parse(&content).context(format!("In {}", self.path.display()))
    }
}

/// Minimal `.properties` reader: `key=value` or `key: value`, `#`/`!` comments
pub fn parse_properties(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .filter_map(|line| {
            let split = line.find(['=', ':'])?;
            let key = line[..split].trim();
            let value = line[split + 1..].trim();
            Some((unescape(key), unescape(value)))
        })
        .collect()
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(Error::from)
        .context(format!("Failed to read release metadata from {}", path.display()))
}
