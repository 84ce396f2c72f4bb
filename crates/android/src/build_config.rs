//! The validated, immutable build configuration

use crate::compatibility::LanguageCompatibility;
use crate::declaration::Declaration;
use crate::release::ReleaseMetadata;
use droidcfg_core::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// A resolved configuration, ready to hand to the external build tool
///
/// Only the resolver constructs one. Fields are read through accessors; the
/// serialized form uses the same camelCase keys as the declaration plus
/// `versionCode` and `versionName`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    plugins: BTreeSet<String>,
    application_id: String,
    namespace: String,
    compile_sdk_version: u32,
    target_sdk_version: u32,
    min_sdk_version: u32,
    native_toolchain_version: String,
    language_compatibility: LanguageCompatibility,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    jvm_target: Option<String>,
    version_code: u32,
    version_name: String,
    signing_configs: BTreeSet<String>,
    signing_assignment: BTreeMap<String, String>,
    dependency_overrides: BTreeMap<String, String>,
    source_root: PathBuf,
}

impl BuildConfig {
    /// Assemble from an already validated declaration
    pub(crate) fn from_validated(declaration: &Declaration, metadata: &ReleaseMetadata) -> Self {
        Self {
            plugins: declaration.plugins.clone(),
            application_id: declaration.application_id.clone(),
            namespace: declaration.namespace.clone(),
            compile_sdk_version: declaration.compile_sdk_version,
            target_sdk_version: declaration.target_sdk_version,
            min_sdk_version: declaration.min_sdk_version,
            native_toolchain_version: declaration.native_toolchain_version.clone(),
            language_compatibility: declaration.language_compatibility.clone(),
            jvm_target: declaration.jvm_target.clone(),
            version_code: metadata.version_code,
            version_name: metadata.version_name.clone(),
            signing_configs: declaration.signing_configs.clone(),
            signing_assignment: declaration.signing_assignment.clone(),
            dependency_overrides: declaration.dependency_overrides.clone(),
            source_root: declaration.source_root.clone(),
        }
    }

    pub fn plugins(&self) -> &BTreeSet<String> {
        &self.plugins
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn compile_sdk_version(&self) -> u32 {
        self.compile_sdk_version
    }

    pub fn target_sdk_version(&self) -> u32 {
        self.target_sdk_version
    }

    pub fn min_sdk_version(&self) -> u32 {
        self.min_sdk_version
    }

    pub fn native_toolchain_version(&self) -> &str {
        &self.native_toolchain_version
    }

    pub fn language_compatibility(&self) -> &LanguageCompatibility {
        &self.language_compatibility
    }

    pub fn jvm_target(&self) -> Option<&str> {
        self.jvm_target.as_deref()
    }

    pub fn version_code(&self) -> u32 {
        self.version_code
    }

    pub fn version_name(&self) -> &str {
        &self.version_name
    }

    pub fn signing_configs(&self) -> &BTreeSet<String> {
        &self.signing_configs
    }

    pub fn signing_assignment(&self) -> &BTreeMap<String, String> {
        &self.signing_assignment
    }

    /// Signing config assigned to a build variant
    pub fn signing_config_for(&self, variant: &str) -> Option<&str> {
        self.signing_assignment.get(variant).map(String::as_str)
    }

    pub fn dependency_overrides(&self) -> &BTreeMap<String, String> {
        &self.dependency_overrides
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Release metadata the configuration was resolved with
    pub fn release_metadata(&self) -> ReleaseMetadata {
        ReleaseMetadata::new(self.version_code, self.version_name.clone())
    }

    /// Serialize to the output shape consumed by the build tool
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a previously emitted configuration
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
