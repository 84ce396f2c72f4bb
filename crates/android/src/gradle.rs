//! Gradle Kotlin DSL interop
//!
//! Imports a declaration from an application module's `build.gradle.kts`
//! and renders a resolved configuration back into one. The importer is
//! pattern based: it understands the blocks a Flutter wrapper module uses,
//! not arbitrary Kotlin.

use crate::build_config::BuildConfig;
use crate::compatibility::{gradle_level, java_version_expression, jvm_target_expression, LanguageCompatibility};
use crate::coordinate::split_force_notation;
use crate::declaration::Declaration;
use crate::error::ConfigError;
use droidcfg_core::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tracing::warn;

/// Signing config the Android Gradle plugin always creates
pub const IMPLICIT_SIGNING_CONFIG: &str = "debug";

static PLUGIN_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bid\(\s*"([^"]+)"\s*\)|\bkotlin\(\s*"android"\s*\)"#).unwrap());
static NAMED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:\b(?:getByName|create|register|maybeCreate)\(\s*"([^"]+)"\s*\)|\b(\w+))\s*\{"#)
        .unwrap()
});
static BLOCK_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\w+)\s*\{").unwrap());
static ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:\w+\.)*(\w+)[ \t]*(?:=[ \t]*(.+?)|\.set\([ \t]*(.+?)[ \t]*\))[ \t\r]*;?[ \t\r]*$")
        .unwrap()
});
static CREATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\b(?:create|register|maybeCreate|getByName)\(\s*"([^"]+)"\s*\)"#).unwrap());
static SIGNING_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bsigningConfig\s*=\s*signingConfigs\.getByName\(\s*"([^"]+)"\s*\)"#).unwrap()
});
static FORCE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\bforce\(\s*"([^"]+)"\s*\)"#).unwrap());

/// Parse a `build.gradle.kts` into a declaration
///
/// `versionCode` and `versionName` are ignored: they belong to the release
/// metadata, not the declaration. Compatibility levels are translated from
/// their Gradle spelling (`JavaVersion.VERSION_1_8` becomes `1.8`).
pub fn import_kts(script: &str) -> Result<Declaration> {
    let script = strip_comments(script);
    let android = block(&script, "android")
        .ok_or_else(|| missing("android { } block", "android"))?;

    let plugins = block(&script, "plugins")
        .map(|body| {
            PLUGIN_ID
                .captures_iter(body)
                .map(|c| match c.get(1) {
                    Some(id) => id.as_str().to_string(),
                    None => "org.jetbrains.kotlin.android".to_string(),
                })
                .collect::<BTreeSet<_>>()
        })
        .unwrap_or_default();

    let default_config = block(android, "defaultConfig").unwrap_or_default();
    let compile_options = block(android, "compileOptions").unwrap_or_default();

    let source = assignment(compile_options, "sourceCompatibility")
        .ok_or_else(|| missing("compileOptions.sourceCompatibility", "languageCompatibility.source"))?;
    let target = assignment(compile_options, "targetCompatibility")
        .ok_or_else(|| missing("compileOptions.targetCompatibility", "languageCompatibility.target"))?;

    let jvm_target = block(android, "kotlinOptions")
        .or_else(|| block(&script, "compilerOptions"))
        .and_then(|body| assignment(body, "jvmTarget"))
        .map(|raw| gradle_level(&raw));

    let mut signing_configs = BTreeSet::from([IMPLICIT_SIGNING_CONFIG.to_string()]);
    if let Some(body) = block(android, "signingConfigs") {
        signing_configs.extend(CREATE.captures_iter(body).map(|c| c[1].to_string()));
    }

    let mut signing_assignment = BTreeMap::new();
    if let Some(body) = block(android, "buildTypes") {
        for (variant, variant_body) in named_blocks(body) {
            if let Some(c) = SIGNING_REF.captures(variant_body) {
                signing_assignment.insert(variant, c[1].to_string());
            }
        }
    }

    let source_root = block(&script, "flutter")
        .and_then(|body| assignment(body, "source"))
        .map(|raw| PathBuf::from(unquote(&raw)))
        .ok_or_else(|| missing("flutter { source }", "sourceRoot"))?;

    Ok(Declaration {
        plugins,
        application_id: string_assignment(default_config, "applicationId", "applicationId")?,
        namespace: string_assignment(android, "namespace", "namespace")?,
        compile_sdk_version: sdk_assignment(android, "compileSdk", "compileSdkVersion")?,
        target_sdk_version: sdk_assignment(default_config, "targetSdk", "targetSdkVersion")?,
        min_sdk_version: sdk_assignment(default_config, "minSdk", "minSdkVersion")?,
        native_toolchain_version: string_assignment(android, "ndkVersion", "nativeToolchainVersion")?,
        jvm_target,
        signing_configs,
        source_root,
        language_compatibility: LanguageCompatibility {
            source: gradle_level(&source),
            target: gradle_level(&target),
        },
        signing_assignment,
        dependency_overrides: forced_versions(&script)?,
    })
}

/// Render a resolved configuration as a `build.gradle.kts`
///
/// The `debug` signing config is never written out since the Android
/// Gradle plugin provides it; importing the script adds it back.
pub fn render_kts(config: &BuildConfig) -> String {
    if !config.signing_configs().contains(IMPLICIT_SIGNING_CONFIG) {
        warn!(
            application_id = %config.application_id(),
            "Rendered script will still provide the implicit debug signing config"
        );
    }

    let mut out = String::new();

    let mut plugins: Vec<&String> = config.plugins().iter().collect();
    plugins.sort_by(|a, b| plugin_rank(a).cmp(&plugin_rank(b)).then_with(|| a.cmp(b)));
    out.push_str("plugins {\n");
    for plugin in plugins {
        out.push_str(&format!("    id({})\n", kts_string(plugin)));
    }
    out.push_str("}\n\n");

    let compat = config.language_compatibility();
    out.push_str("android {\n");
    out.push_str(&format!("    namespace = {}\n", kts_string(config.namespace())));
    out.push_str(&format!("    compileSdk = {}\n", config.compile_sdk_version()));
    out.push_str(&format!(
        "    ndkVersion = {}\n",
        kts_string(config.native_toolchain_version())
    ));
    out.push('\n');
    out.push_str("    compileOptions {\n");
    out.push_str(&format!(
        "        sourceCompatibility = {}\n",
        java_version_expression(&compat.source)
    ));
    out.push_str(&format!(
        "        targetCompatibility = {}\n",
        java_version_expression(&compat.target)
    ));
    out.push_str("    }\n");

    if let Some(jvm_target) = config.jvm_target() {
        out.push('\n');
        out.push_str("    kotlinOptions {\n");
        out.push_str(&format!("        jvmTarget = {}\n", jvm_target_expression(jvm_target)));
        out.push_str("    }\n");
    }

    let extra_configs: Vec<&String> = config
        .signing_configs()
        .iter()
        .filter(|c| c.as_str() != IMPLICIT_SIGNING_CONFIG)
        .collect();
    if !extra_configs.is_empty() {
        out.push('\n');
        out.push_str("    signingConfigs {\n");
        for name in extra_configs {
            out.push_str(&format!("        create({})\n", kts_string(name)));
        }
        out.push_str("    }\n");
    }

    out.push('\n');
    out.push_str("    defaultConfig {\n");
    out.push_str(&format!(
        "        applicationId = {}\n",
        kts_string(config.application_id())
    ));
    out.push_str(&format!("        minSdk = {}\n", config.min_sdk_version()));
    out.push_str(&format!("        targetSdk = {}\n", config.target_sdk_version()));
    out.push_str(&format!("        versionCode = {}\n", config.version_code()));
    out.push_str(&format!(
        "        versionName = {}\n",
        kts_string(config.version_name())
    ));
    out.push_str("    }\n");

    if !config.signing_assignment().is_empty() {
        out.push('\n');
        out.push_str("    buildTypes {\n");
        for (variant, signing_config) in config.signing_assignment() {
            let opener = match variant.as_str() {
                "debug" | "release" => format!("getByName({})", kts_string(variant)),
                _ => format!("create({})", kts_string(variant)),
            };
            out.push_str(&format!("        {} {{\n", opener));
            out.push_str(&format!(
                "            signingConfig = signingConfigs.getByName({})\n",
                kts_string(signing_config)
            ));
            out.push_str("        }\n");
        }
        out.push_str("    }\n");
    }
    out.push_str("}\n\n");

    if !config.dependency_overrides().is_empty() {
        out.push_str("configurations {\n    all {\n        resolutionStrategy {\n");
        for (coordinate, version) in config.dependency_overrides() {
            out.push_str(&format!(
                "            force({})\n",
                kts_string(&format!("{}:{}", coordinate, version))
            ));
        }
        out.push_str("        }\n    }\n}\n\n");
    }

    out.push_str("flutter {\n");
    out.push_str(&format!(
        "    source = {}\n",
        kts_string(&config.source_root().to_string_lossy())
    ));
    out.push_str("}\n");
    out
}

/// The Flutter plugin must be applied after the Android and Kotlin plugins
fn plugin_rank(id: &str) -> u8 {
    match id {
        id if id.starts_with("com.android.") => 0,
        "kotlin-android" | "org.jetbrains.kotlin.android" => 1,
        id if id.starts_with("dev.flutter.") => 3,
        _ => 2,
    }
}

fn kts_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' | '$' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn unquote(raw: &str) -> String {
    let raw = raw.trim();
    let inner = raw
        .strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .unwrap_or(raw);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
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

fn missing(what: &str, field: &str) -> Error {
    Error::gradle(format!("{} not found in build script", what)).with_field(field)
}

/// Right-hand side of `name = value` or `name.set(value)` on a single line
fn assignment(body: &str, name: &str) -> Option<String> {
    ASSIGNMENT
        .captures_iter(body)
        .find(|c| &c[1] == name)
        .and_then(|c| c.get(2).or_else(|| c.get(3)))
        .map(|m| m.as_str().to_string())
}

fn string_assignment(body: &str, name: &str, field: &str) -> Result<String> {
    let raw = assignment(body, name).ok_or_else(|| missing(name, field))?;
    if !raw.starts_with('"') {
        return Err(Error::gradle(format!(
            "{} = {} is not a string literal; the value is computed at build time",
            name, raw
        ))
        .with_field(field)
        .with_suggestion(format!("Pin {} to a literal before resolving", name)));
    }
    Ok(unquote(&raw))
}

fn sdk_assignment(body: &str, name: &str, field: &str) -> Result<u32> {
    let raw = assignment(body, name)
        .or_else(|| assignment(body, &format!("{}Version", name)))
        .ok_or_else(|| missing(name, field))?;
    raw.parse::<u32>().map_err(|_| {
        Error::gradle(format!(
            "{} = {} is not an integer literal; the value is computed at build time",
            name, raw
        ))
        .with_field(field)
        .with_suggestion(format!("Pin {} to a literal API level before resolving", name))
    })
}

fn forced_versions(script: &str) -> Result<BTreeMap<String, String>> {
    let mut overrides: BTreeMap<String, String> = BTreeMap::new();
    for c in FORCE.captures_iter(script) {
        let notation = &c[1];
        let (coordinate, version) = split_force_notation(notation).map_err(|reason| {
            Error::from(ConfigError::InvalidDependencyOverride {
                coordinate: notation.to_string(),
                reason,
            })
        })?;

        let key = coordinate.to_string();
        match overrides.get(&key) {
            Some(existing) if *existing != version => {
                return Err(ConfigError::InvalidDependencyOverride {
                    coordinate: key,
                    reason: format!("forced to both '{}' and '{}'", existing, version),
                }
                .into());
            }
            _ => {
                overrides.insert(key, version);
            }
        }
    }
    Ok(overrides)
}

/// Body of the first `name { ... }` block
fn block<'a>(source: &'a str, name: &str) -> Option<&'a str> {
    let open = BLOCK_OPEN
        .captures_iter(source)
        .find(|c| &c[1] == name)?
        .get(0)?;
    let end = matching_brace(source, open.end())?;
    Some(&source[open.end()..end])
}

/// Top-level `name { }` / `getByName("name") { }` blocks of a container body
fn named_blocks(body: &str) -> Vec<(String, &str)> {
    let mut blocks = Vec::new();
    let mut cursor = 0;
    for c in NAMED_BLOCK.captures_iter(body) {
        let Some(whole) = c.get(0) else { continue };
        if whole.start() < cursor {
            continue;
        }
        let Some(end) = matching_brace(body, whole.end()) else {
            break;
        };
        let name = c.get(1).or_else(|| c.get(2)).map(|m| m.as_str().to_string());
        if let Some(name) = name {
            blocks.push((name, &body[whole.end()..end]));
        }
        cursor = end;
    }
    blocks
}

/// Index of the `}` closing a block whose body starts at `start`
fn matching_brace(source: &str, start: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in source[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Remove `//` and `/* */` comments outside string literals
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek().copied()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::fixtures;
    use crate::release::ReleaseMetadata;
    use crate::resolver::resolve;
    use proptest::prelude::*;
    use proptest::sample::{select, subsequence, Index};

    const FLUTTER_WRAPPER: &str = r#"plugins {
    id("com.android.application")
    id("kotlin-android")
    id("dev.flutter.flutter-gradle-plugin")
}

android {
    namespace = "com.example.michaelesp32"
    compileSdk = 35
    ndkVersion = "27.0.12077973"

    compileOptions {
        sourceCompatibility = JavaVersion.VERSION_11
        targetCompatibility = JavaVersion.VERSION_11
    }

    kotlinOptions {
        jvmTarget = JavaVersion.VERSION_11.toString()
    }

    defaultConfig {
        applicationId = "com.example.michaelesp32"
        minSdk = 21 // Explicitly set to ensure compatibility
        targetSdk = 35 // Matches compileSdk for modern APIs
        versionCode = flutter.versionCode
        versionName = flutter.versionName
    }

    buildTypes {
        release {
            signingConfig = signingConfigs.getByName("debug") // Retained for testing
        }
    }

    configurations {
        all {
            resolutionStrategy {
                force("androidx.core:core:1.9.0") // Ensures compatibility with lStar
            }
        }
    }
}

flutter {
    source = "../.."
}
"#;

    #[test]
    fn test_import_flutter_wrapper() {
        let decl = import_kts(FLUTTER_WRAPPER).unwrap();
        assert_eq!(decl, fixtures::reference());
    }

    #[test]
    fn test_imported_wrapper_resolves() {
        let decl = import_kts(FLUTTER_WRAPPER).unwrap();
        let config = resolve(&decl, &ReleaseMetadata::new(1, "1.0.0")).unwrap();
        assert_eq!(config.min_sdk_version(), 21);
        assert_eq!(config.signing_config_for("release"), Some("debug"));
        assert_eq!(config.dependency_overrides()["androidx.core:core"], "1.9.0");
    }

    #[test]
    fn test_render_then_import() {
        let config = resolve(&fixtures::reference(), &ReleaseMetadata::new(4, "1.1.0")).unwrap();
        let script = render_kts(&config);

        assert!(script.contains("versionCode = 4"));
        assert!(script.contains("force(\"androidx.core:core:1.9.0\")"));
        assert_eq!(import_kts(&script).unwrap(), fixtures::reference());
    }

    #[test]
    fn test_render_then_import_keeps_declared_levels() {
        let mut decl = fixtures::reference();
        decl.language_compatibility = LanguageCompatibility::pinned("11.0.2");
        decl.jvm_target = Some("11.0.2".to_string());
        decl.signing_configs.insert("upload".to_string());
        decl.signing_assignment.insert("release".to_string(), "upload".to_string());

        let config = resolve(&decl, &ReleaseMetadata::new(9, "2.0.0")).unwrap();
        let script = render_kts(&config);

        assert!(script.contains("sourceCompatibility = JavaVersion.toVersion(\"11.0.2\")"));
        assert!(script.contains("jvmTarget = \"11.0.2\""));
        assert_eq!(import_kts(&script).unwrap(), decl);
    }

    #[test]
    fn test_legacy_level_survives_render() {
        let mut decl = fixtures::reference();
        decl.language_compatibility = LanguageCompatibility::pinned("1.8");
        decl.jvm_target = Some("1.8".to_string());

        let config = resolve(&decl, &ReleaseMetadata::new(1, "1.0")).unwrap();
        let script = render_kts(&config);

        assert!(script.contains("targetCompatibility = JavaVersion.VERSION_1_8"));
        assert!(script.contains("jvmTarget = JavaVersion.VERSION_1_8.toString()"));
        assert_eq!(import_kts(&script).unwrap(), decl);
    }

    #[test]
    fn test_import_restores_implicit_debug_config() {
        let mut decl = fixtures::reference();
        decl.signing_configs = BTreeSet::from(["upload".to_string()]);
        decl.signing_assignment = BTreeMap::from([("release".to_string(), "upload".to_string())]);

        let config = BuildConfig::from_validated(&decl, &ReleaseMetadata::new(1, "1.0"));
        let back = import_kts(&render_kts(&config)).unwrap();

        assert_eq!(
            back.signing_configs,
            BTreeSet::from(["debug".to_string(), "upload".to_string()])
        );
        assert_eq!(back.signing_assignment, decl.signing_assignment);
    }

    #[test]
    fn test_import_compiler_options_setter() {
        let script = FLUTTER_WRAPPER
            .replace(
                "    kotlinOptions {\n        jvmTarget = JavaVersion.VERSION_11.toString()\n    }\n",
                "",
            )
            .replace(
                "flutter {",
                "kotlin {\n    compilerOptions {\n        jvmTarget.set(JvmTarget.JVM_11)\n    }\n}\n\nflutter {",
            );
        let decl = import_kts(&script).unwrap();
        assert_eq!(decl.jvm_target.as_deref(), Some("11"));
        assert_eq!(decl, fixtures::reference());
    }

    #[test]
    fn test_import_legacy_java_version() {
        let script = FLUTTER_WRAPPER.replace("VERSION_11", "VERSION_1_8");
        let decl = import_kts(&script).unwrap();
        assert_eq!(decl.language_compatibility, LanguageCompatibility::pinned("1.8"));
        assert_eq!(decl.jvm_target.as_deref(), Some("1.8"));
    }

    #[test]
    fn test_render_orders_flutter_plugin_last() {
        let config = resolve(&fixtures::reference(), &ReleaseMetadata::new(1, "1.0")).unwrap();
        let script = render_kts(&config);

        let android = script.find("com.android.application").unwrap();
        let kotlin = script.find("kotlin-android").unwrap();
        let flutter = script.find("dev.flutter.flutter-gradle-plugin").unwrap();
        assert!(android < kotlin && kotlin < flutter);
    }

    #[test]
    fn test_import_custom_signing_config_and_variant() {
        let script = FLUTTER_WRAPPER
            .replace(
                "    buildTypes {",
                "    signingConfigs {\n        create(\"upload\") {\n            storeFile = file(\"upload.jks\")\n        }\n    }\n\n    buildTypes {\n        create(\"staging\") {\n            signingConfig = signingConfigs.getByName(\"upload\")\n        }",
            );
        let decl = import_kts(&script).unwrap();

        assert!(decl.signing_configs.contains("upload"));
        assert!(decl.signing_configs.contains("debug"));
        assert_eq!(decl.signing_assignment["staging"], "upload");
        assert_eq!(decl.signing_assignment["release"], "debug");
    }

    #[test]
    fn test_import_conflicting_forces() {
        let script = FLUTTER_WRAPPER.replace(
            "force(\"androidx.core:core:1.9.0\")",
            "force(\"androidx.core:core:1.9.0\")\n                force(\"androidx.core:core:1.10.1\")",
        );
        let err = import_kts(&script).unwrap_err();
        assert_eq!(err.code, droidcfg_core::ErrorCode::InvalidDependencyOverride);
    }

    #[test]
    fn test_import_rejects_computed_sdk() {
        let script = FLUTTER_WRAPPER.replace("compileSdk = 35", "compileSdk = flutter.compileSdkVersion");
        let err = import_kts(&script).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("compileSdkVersion"));
        assert_eq!(err.code, droidcfg_core::ErrorCode::GradleError);
    }

    #[test]
    fn test_import_rejects_computed_ndk_version() {
        let script = FLUTTER_WRAPPER.replace(
            "ndkVersion = \"27.0.12077973\"",
            "ndkVersion = flutter.ndkVersion",
        );
        let err = import_kts(&script).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("nativeToolchainVersion"));
    }

    #[test]
    fn test_import_requires_flutter_source() {
        let script = FLUTTER_WRAPPER.replace("    source = \"../..\"\n", "");
        let err = import_kts(&script).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("sourceRoot"));
    }

    #[test]
    fn test_strip_comments_keeps_strings() {
        let stripped = strip_comments("url = \"https://example.com\" // remote\n/* block\n */x = 1");
        assert_eq!(stripped, "url = \"https://example.com\" \n\nx = 1");
    }

    #[test]
    fn test_kts_string_escapes_templates() {
        assert_eq!(kts_string("1.0-$BUILD"), "\"1.0-\\$BUILD\"");
    }

    fn declaration() -> impl Strategy<Value = Declaration> {
        let identity = (
            r"[a-z]{2,8}\.[a-z]{2,8}",
            r"[a-z]{2,8}\.[a-z]{2,8}\.[a-z]{2,6}",
            r"[0-9]{2}\.[0-9]\.[0-9]{4,8}",
            r"[a-z.]{1,6}(/[a-z]{1,6}){0,2}",
        );
        let sdks = (1u32..=40, 0u32..=10, 0u32..=10);
        let compat = (
            select(vec!["1.8", "11", "17", "21", "11.0.2", "17.0.1-ea"]),
            any::<bool>(),
        );
        let plugins = subsequence(
            vec![
                "com.android.application",
                "kotlin-android",
                "org.jetbrains.kotlin.android",
                "dev.flutter.flutter-gradle-plugin",
            ],
            0..=4,
        );
        let signing = (
            subsequence(vec!["upload", "prod", "play"], 0..=3),
            subsequence(vec!["debug", "release", "profile", "staging"], 0..=4),
            any::<Index>(),
        );
        let overrides = prop::collection::btree_map(
            r"[a-z]{2,6}\.[a-z]{2,6}:[a-z]{2,8}",
            r"[0-9]\.[0-9]{1,2}\.[0-9]",
            0..3,
        );

        (identity, sdks, compat, plugins, signing, overrides).prop_map(
            |(
                (application_id, namespace, ndk, root),
                (min, target_delta, compile_delta),
                (level, with_jvm_target),
                plugins,
                (configs, variants, pick),
                dependency_overrides,
            )| {
                let mut signing_configs = BTreeSet::from([IMPLICIT_SIGNING_CONFIG.to_string()]);
                signing_configs.extend(configs.into_iter().map(String::from));
                let known: Vec<&String> = signing_configs.iter().collect();
                let signing_assignment = variants
                    .into_iter()
                    .enumerate()
                    .map(|(i, variant)| {
                        let config = known[(pick.index(known.len()) + i) % known.len()];
                        (variant.to_string(), config.clone())
                    })
                    .collect();

                Declaration {
                    plugins: plugins.into_iter().map(String::from).collect(),
                    application_id,
                    namespace,
                    compile_sdk_version: min + target_delta + compile_delta,
                    target_sdk_version: min + target_delta,
                    min_sdk_version: min,
                    native_toolchain_version: ndk,
                    jvm_target: with_jvm_target.then(|| level.to_string()),
                    signing_configs,
                    source_root: PathBuf::from(root),
                    language_compatibility: LanguageCompatibility::pinned(level),
                    signing_assignment,
                    dependency_overrides,
                }
            },
        )
    }

    proptest! {
        #[test]
        fn prop_render_then_import_is_identity(decl in declaration()) {
            let config = BuildConfig::from_validated(&decl, &ReleaseMetadata::new(1, "1.0.0"));
            let back = import_kts(&render_kts(&config)).unwrap();
            prop_assert_eq!(back, decl);
        }
    }
}
