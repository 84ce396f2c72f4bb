//! Configuration resolver
//!
//! Turns a [`Declaration`] plus [`ReleaseMetadata`] into a [`BuildConfig`],
//! or fails with the first violated constraint. Checks run in a fixed order
//! so the reported error is stable:
//!
//! 1. required plugins
//! 2. SDK ordering
//! 3. compatibility levels
//! 4. signing assignment
//! 5. dependency overrides
//! 6. `applicationId` / `namespace`
//! 7. toolchain version and release metadata
//!
//! Resolution reads nothing but its arguments.

use crate::build_config::BuildConfig;
use crate::compatibility::parse_level;
use crate::coordinate::{check_version, Coordinate};
use crate::declaration::Declaration;
use crate::error::{ConfigError, Result};
use crate::identifier::check_dotted_identifier;
use crate::release::ReleaseMetadata;
use droidcfg_core::config::{ResolverConfig, DEFAULT_REQUIRED_PLUGINS};
use droidcfg_core::validation::{ValidationResult, Validator};
use rayon::prelude::*;
use tracing::{debug, info};

/// Highest `versionCode` Google Play accepts
pub const MAX_VERSION_CODE: u32 = 2_100_000_000;

/// Plugin id of the Kotlin Android plugin
pub const KOTLIN_ANDROID_PLUGIN: &str = "org.jetbrains.kotlin.android";

/// Map plugin aliases onto one canonical id
pub fn canonical_plugin_id(id: &str) -> &str {
    match id {
        "kotlin-android" => KOTLIN_ANDROID_PLUGIN,
        other => other,
    }
}

/// What every declaration must satisfy beyond its own invariants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverPolicy {
    pub required_plugins: Vec<String>,
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        Self {
            required_plugins: DEFAULT_REQUIRED_PLUGINS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl From<&ResolverConfig> for ResolverPolicy {
    fn from(config: &ResolverConfig) -> Self {
        Self {
            required_plugins: config.required_plugins.clone(),
        }
    }
}

/// One independent unit of work for [`Resolver::resolve_all`]
#[derive(Debug, Clone)]
pub struct ResolveJob {
    pub declaration: Declaration,
    pub metadata: ReleaseMetadata,
}

/// Resolves declarations under a policy
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    policy: ResolverPolicy,
}

/// Resolve with the default policy
pub fn resolve(declaration: &Declaration, metadata: &ReleaseMetadata) -> Result<BuildConfig> {
    Resolver::default().resolve(declaration, metadata)
}

impl Resolver {
    pub fn new(policy: ResolverPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ResolverPolicy {
        &self.policy
    }

    /// Validate a declaration and build the immutable configuration
    pub fn resolve(
        &self,
        declaration: &Declaration,
        metadata: &ReleaseMetadata,
    ) -> Result<BuildConfig> {
        debug!(application_id = %declaration.application_id, "Resolving declaration");

        self.check_plugins(declaration)?;
        check_sdk_range(declaration)?;
        check_compatibility(declaration)?;
        check_signing(declaration)?;
        check_overrides(declaration)?;
        check_identifiers(declaration)?;
        check_fields(declaration, metadata)?;

        let config = BuildConfig::from_validated(declaration, metadata);
        info!(
            application_id = %config.application_id(),
            version_code = config.version_code(),
            version_name = %config.version_name(),
            "Build configuration resolved"
        );
        Ok(config)
    }

    /// Resolve independent jobs in parallel; results keep the input order
    pub fn resolve_all(&self, jobs: &[ResolveJob]) -> Vec<Result<BuildConfig>> {
        debug!(jobs = jobs.len(), "Resolving in parallel");
        jobs.par_iter()
            .map(|job| self.resolve(&job.declaration, &job.metadata))
            .collect()
    }

    /// Non-blocking observations about a resolved configuration
    pub fn lint(&self, config: &BuildConfig) -> ValidationResult {
        let toolchain = config.native_toolchain_version();
        Validator::new()
            .warn_if(
                "nativeToolchainVersion",
                semver::Version::parse(toolchain).is_err(),
                &format!("'{}' is not a MAJOR.MINOR.PATCH version", toolchain),
            )
            .warn_if(
                "targetSdkVersion",
                config.target_sdk_version() < config.compile_sdk_version(),
                "targets an older API level than it compiles against",
            )
            .warn_if(
                "signingAssignment.release",
                config.signing_config_for("release") == Some("debug"),
                "release builds are signed with the debug key",
            )
            .validate()
    }

    fn check_plugins(&self, declaration: &Declaration) -> Result<()> {
        debug!("Checking required plugins");
        let applied: Vec<&str> = declaration
            .plugins
            .iter()
            .map(|p| canonical_plugin_id(p))
            .collect();

        let kotlin = declaration
            .jvm_target
            .as_ref()
            .map(|_| KOTLIN_ANDROID_PLUGIN);

        for required in self
            .policy
            .required_plugins
            .iter()
            .map(String::as_str)
            .chain(kotlin)
        {
            if !applied.contains(&canonical_plugin_id(required)) {
                return Err(ConfigError::MissingPlugin {
                    plugin: required.to_string(),
                });
            }
        }
        Ok(())
    }
}

fn check_sdk_range(declaration: &Declaration) -> Result<()> {
    debug!("Checking SDK ordering");
    let (min, target, compile) = (
        declaration.min_sdk_version,
        declaration.target_sdk_version,
        declaration.compile_sdk_version,
    );

    let field = if min < 1 || min > target {
        "minSdkVersion"
    } else if target > compile {
        "targetSdkVersion"
    } else {
        return Ok(());
    };

    Err(ConfigError::SdkRange {
        field,
        min_sdk: min,
        target_sdk: target,
        compile_sdk: compile,
    })
}

fn check_compatibility(declaration: &Declaration) -> Result<()> {
    debug!("Checking compatibility levels");
    let compat = &declaration.language_compatibility;
    check_level("languageCompatibility.source", &compat.source)?;
    check_level("languageCompatibility.target", &compat.target)?;

    if compat.source != compat.target {
        return Err(ConfigError::CompatibilityMismatch {
            field: "languageCompatibility.target".to_string(),
            reason: format!(
                "target level '{}' differs from source level '{}'",
                compat.target, compat.source
            ),
        });
    }

    if let Some(jvm_target) = &declaration.jvm_target {
        check_level("jvmTarget", jvm_target)?;
        if *jvm_target != compat.source {
            return Err(ConfigError::CompatibilityMismatch {
                field: "jvmTarget".to_string(),
                reason: format!(
                    "'{}' differs from the pinned compatibility level '{}'",
                    jvm_target, compat.source
                ),
            });
        }
    }
    Ok(())
}

fn check_level(field: &str, level: &str) -> Result<()> {
    match parse_level(level) {
        Some(_) => Ok(()),
        None => Err(ConfigError::CompatibilityMismatch {
            field: field.to_string(),
            reason: format!("'{}' is not a semantic version", level),
        }),
    }
}

fn check_signing(declaration: &Declaration) -> Result<()> {
    debug!("Checking signing assignment");
    for (variant, signing_config) in &declaration.signing_assignment {
        if !declaration.signing_configs.contains(signing_config) {
            return Err(ConfigError::UnknownSigningConfig {
                variant: variant.clone(),
                signing_config: signing_config.clone(),
                known: declaration.signing_configs.iter().cloned().collect(),
            });
        }
    }
    Ok(())
}

fn check_overrides(declaration: &Declaration) -> Result<()> {
    debug!("Checking dependency overrides");
    for (key, version) in &declaration.dependency_overrides {
        Coordinate::parse(key)
            .and_then(|_| check_version(version))
            .map_err(|reason| ConfigError::InvalidDependencyOverride {
                coordinate: key.clone(),
                reason,
            })?;
    }
    Ok(())
}

fn check_identifiers(declaration: &Declaration) -> Result<()> {
    debug!("Checking identifiers");
    for (field, value) in [
        ("applicationId", &declaration.application_id),
        ("namespace", &declaration.namespace),
    ] {
        check_dotted_identifier(value).map_err(|reason| ConfigError::InvalidIdentifier {
            field,
            value: value.clone(),
            reason,
        })?;
    }
    Ok(())
}

fn check_fields(declaration: &Declaration, metadata: &ReleaseMetadata) -> Result<()> {
    debug!("Checking toolchain and release metadata");
    if declaration.native_toolchain_version.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            field: "nativeToolchainVersion",
            reason: "must not be empty".to_string(),
        });
    }
    if !(1..=MAX_VERSION_CODE).contains(&metadata.version_code) {
        return Err(ConfigError::InvalidField {
            field: "versionCode",
            reason: format!(
                "{} is outside 1..={}",
                metadata.version_code, MAX_VERSION_CODE
            ),
        });
    }
    if metadata.version_name.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            field: "versionName",
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}
