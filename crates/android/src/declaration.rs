//! Raw, unvalidated build declarations
//!
//! A declaration mirrors the `android { ... }` block of an application
//! module. It can be written as TOML or JSON, or imported from a Gradle
//! Kotlin DSL script.

use crate::compatibility::LanguageCompatibility;
use crate::gradle;
use droidcfg_core::error::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Declarative input to the resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Declaration {
    #[serde(default)]
    pub plugins: BTreeSet<String>,
    pub application_id: String,
    pub namespace: String,
    pub compile_sdk_version: u32,
    pub target_sdk_version: u32,
    pub min_sdk_version: u32,
    pub native_toolchain_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jvm_target: Option<String>,
    #[serde(default)]
    pub signing_configs: BTreeSet<String>,
    pub source_root: PathBuf,
    pub language_compatibility: LanguageCompatibility,
    #[serde(default)]
    pub signing_assignment: BTreeMap<String, String>,
    #[serde(default)]
    pub dependency_overrides: BTreeMap<String, String>,
}

/// On-disk formats a declaration can be read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationFormat {
    Toml,
    Json,
    GradleKts,
}

impl DeclarationFormat {
    /// Detect the format from a file name
    pub fn detect(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy();
        if name.ends_with(".gradle.kts") {
            Some(Self::GradleKts)
        } else if name.ends_with(".toml") {
            Some(Self::Toml)
        } else if name.ends_with(".json") {
            Some(Self::Json)
        } else {
            None
        }
    }
}

impl Declaration {
    /// Parse a TOML declaration
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse a JSON declaration
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Serialize as a TOML declaration
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Read a declaration, choosing the parser from the file name
    pub fn load(path: &Path) -> Result<Self> {
        let format = DeclarationFormat::detect(path).ok_or_else(|| Error::unsupported_format(path))?;
        let content = std::fs::read_to_string(path)
            .map_err(Error::from)
            .context(format!("Failed to read declaration {}", path.display()))?;

        tracing::debug!(path = %path.display(), ?format, "Loading declaration");

        let parsed = match format {
            DeclarationFormat::Toml => Self::from_toml_str(&content),
            DeclarationFormat::Json => Self::from_json_str(&content),
            DeclarationFormat::GradleKts => gradle::import_kts(&content),
        };
        parsed.context(format!("In {}", path.display()))
    }
}
