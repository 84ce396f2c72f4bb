//! End-to-end tests for the droidcfg binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const DECLARATION: &str = r#"
plugins = ["com.android.application", "kotlin-android", "dev.flutter.flutter-gradle-plugin"]
applicationId = "com.example.michaelesp32"
namespace = "com.example.michaelesp32"
compileSdkVersion = 35
targetSdkVersion = 35
minSdkVersion = 21
nativeToolchainVersion = "27.0.12077973"
signingConfigs = ["debug"]
sourceRoot = "../.."

[languageCompatibility]
source = "11"
target = "11"

[signingAssignment]
release = "debug"

[dependencyOverrides]
"androidx.core:core" = "1.9.0"
"#;

const BUILD_SCRIPT: &str = r#"plugins {
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
        minSdk = 21
        targetSdk = 35
        versionCode = flutter.versionCode
        versionName = flutter.versionName
    }

    buildTypes {
        release {
            signingConfig = signingConfigs.getByName("debug")
        }
    }
}

configurations {
    all {
        resolutionStrategy {
            force("androidx.core:core:1.9.0")
        }
    }
}

flutter {
    source = "../.."
}
"#;

fn workspace(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, content) in files {
        std::fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

fn droidcfg(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("droidcfg").unwrap();
    cmd.current_dir(dir).arg("--no-color");
    cmd
}

#[test]
fn resolve_emits_json_configuration() {
    let dir = workspace(&[("app.toml", DECLARATION)]);

    let output = droidcfg(dir.path())
        .args(["resolve", "app.toml", "--version-code", "3", "--version-name", "1.2.3"])
        .args(["--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["minSdkVersion"], 21);
    assert_eq!(config["targetSdkVersion"], 35);
    assert_eq!(config["versionCode"], 3);
    assert_eq!(config["versionName"], "1.2.3");
    assert_eq!(config["signingAssignment"]["release"], "debug");
    assert_eq!(config["dependencyOverrides"]["androidx.core:core"], "1.9.0");
}

#[test]
fn resolve_writes_output_file() {
    let dir = workspace(&[("app.toml", DECLARATION)]);

    droidcfg(dir.path())
        .args(["resolve", "app.toml", "--output", "build-config.json"])
        .assert()
        .success();

    let written = std::fs::read_to_string(dir.path().join("build-config.json")).unwrap();
    assert!(written.contains("\"applicationId\": \"com.example.michaelesp32\""));
}

#[test]
fn unknown_signing_config_has_its_own_exit_code() {
    let declaration = DECLARATION.replace("release = \"debug\"", "release = \"prod\"");
    let dir = workspace(&[("app.toml", &declaration)]);

    droidcfg(dir.path())
        .args(["check", "app.toml"])
        .assert()
        .code(12)
        .stderr(predicate::str::contains("signingAssignment.release"))
        .stderr(predicate::str::contains("UnknownSigningConfigError"));
}

#[test]
fn sdk_range_violation_has_its_own_exit_code() {
    let declaration = DECLARATION
        .replace("minSdkVersion = 21", "minSdkVersion = 35")
        .replace("targetSdkVersion = 35", "targetSdkVersion = 21");
    let dir = workspace(&[("app.toml", &declaration)]);

    droidcfg(dir.path())
        .args(["check", "app.toml"])
        .assert()
        .code(10)
        .stderr(predicate::str::contains("minSdkVersion"));
}

#[test]
fn check_reads_version_from_pubspec() {
    let dir = workspace(&[
        ("app.toml", DECLARATION),
        ("pubspec.yaml", "name: michaelesp32\nversion: 2.3.1+42\n"),
    ]);

    droidcfg(dir.path())
        .args(["check", "app.toml", "--pubspec", "pubspec.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 declaration valid"));
}

#[test]
fn check_accepts_several_declarations() {
    let staging = DECLARATION.replace(
        "com.example.michaelesp32\"\nnamespace",
        "com.example.michaelesp32.staging\"\nnamespace",
    );
    let dir = workspace(&[("app.toml", DECLARATION), ("staging.toml", &staging)]);

    droidcfg(dir.path())
        .args(["check", "app.toml", "staging.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 declarations valid"));
}

#[test]
fn import_converts_build_script() {
    let dir = workspace(&[("build.gradle.kts", BUILD_SCRIPT)]);

    droidcfg(dir.path())
        .args(["import", "build.gradle.kts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("applicationId = \"com.example.michaelesp32\""))
        .stdout(predicate::str::contains("jvmTarget = \"11\""))
        .stdout(predicate::str::contains("\"androidx.core:core\" = \"1.9.0\""));
}

#[test]
fn render_inlines_release_metadata() {
    let dir = workspace(&[("build.gradle.kts", BUILD_SCRIPT)]);

    droidcfg(dir.path())
        .args(["render", "build.gradle.kts", "--version-code", "42", "--version-name", "2.3.1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("versionCode = 42"))
        .stdout(predicate::str::contains("versionName = \"2.3.1\""));
}

#[test]
fn unsupported_declaration_format_is_a_config_error() {
    let dir = workspace(&[("build.gradle", "android {}")]);

    droidcfg(dir.path())
        .args(["check", "build.gradle"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Unsupported declaration format"));
}

#[test]
fn version_code_requires_version_name() {
    let dir = workspace(&[("app.toml", DECLARATION)]);

    droidcfg(dir.path())
        .args(["check", "app.toml", "--version-code", "3"])
        .assert()
        .failure();
}

#[test]
fn tool_config_changes_required_plugins() {
    let declaration = DECLARATION.replace(
        "plugins = [\"com.android.application\", \"kotlin-android\", \"dev.flutter.flutter-gradle-plugin\"]",
        "plugins = [\"com.android.application\"]",
    );
    let dir = workspace(&[("app.toml", &declaration)]);

    droidcfg(dir.path())
        .args(["check", "app.toml"])
        .assert()
        .code(15);

    std::fs::write(
        dir.path().join(".droidcfg.toml"),
        "[resolver]\nrequired_plugins = [\"com.android.application\"]\n",
    )
    .unwrap();

    droidcfg(dir.path())
        .args(["check", "app.toml"])
        .assert()
        .success();
}

#[test]
fn compatibility_mismatch_has_its_own_exit_code() {
    let declaration = DECLARATION.replace("target = \"11\"", "target = \"17\"");
    let dir = workspace(&[("app.toml", &declaration)]);

    droidcfg(dir.path())
        .args(["check", "app.toml"])
        .assert()
        .code(11)
        .stderr(predicate::str::contains("CompatibilityMismatchError"))
        .stderr(predicate::str::contains("languageCompatibility.target"));
}

#[test]
fn invalid_dependency_override_has_its_own_exit_code() {
    let declaration = DECLARATION.replace("\"androidx.core:core\" = \"1.9.0\"", "\"androidx.core\" = \"1.9.0\"");
    let dir = workspace(&[("app.toml", &declaration)]);

    droidcfg(dir.path())
        .args(["check", "app.toml"])
        .assert()
        .code(13)
        .stderr(predicate::str::contains("InvalidDependencyOverrideError"));
}

#[test]
fn invalid_identifier_has_its_own_exit_code() {
    let declaration = DECLARATION.replace(
        "applicationId = \"com.example.michaelesp32\"",
        "applicationId = \"michaelesp32\"",
    );
    let dir = workspace(&[("app.toml", &declaration)]);

    droidcfg(dir.path())
        .args(["check", "app.toml"])
        .assert()
        .code(14)
        .stderr(predicate::str::contains("InvalidIdentifierError"))
        .stderr(predicate::str::contains("applicationId"));
}

#[test]
fn invalid_release_metadata_has_its_own_exit_code() {
    let dir = workspace(&[("app.toml", DECLARATION)]);

    droidcfg(dir.path())
        .args(["check", "app.toml", "--version-code", "0", "--version-name", "1.0.0"])
        .assert()
        .code(16)
        .stderr(predicate::str::contains("InvalidFieldError"))
        .stderr(predicate::str::contains("versionCode"));
}

#[test]
fn json_format_reports_errors_as_json() {
    let declaration = DECLARATION.replace("release = \"debug\"", "release = \"prod\"");
    let dir = workspace(&[("app.toml", &declaration)]);

    let output = droidcfg(dir.path())
        .args(["resolve", "app.toml", "--format", "json"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(12));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["code"], "UNKNOWN_SIGNING_CONFIG");
    assert_eq!(report["code_str"], "E6103");
    assert_eq!(report["field"], "signingAssignment.release");
    assert_eq!(report["context"], "In app.toml");
}
