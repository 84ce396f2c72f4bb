//! Android build-configuration resolver
//!
//! This crate validates the declarative configuration of a Flutter
//! application wrapper module and produces the normalized [`BuildConfig`]
//! an external build tool consumes:
//! - Declarations from TOML, JSON or `build.gradle.kts`
//! - Release metadata from `pubspec.yaml`, `local.properties` or explicit values
//! - Resolution with one error kind per violated constraint
//! - Rendering back to a Gradle Kotlin DSL script
//!
//! # Example
//!
//! ```rust,no_run
//! use droidcfg_android::{resolve, Declaration, ReleaseMetadata};
//! use std::path::Path;
//!
//! let declaration = Declaration::load(Path::new("android/app/build.gradle.kts")).unwrap();
//! let config = resolve(&declaration, &ReleaseMetadata::new(1, "1.0.0")).unwrap();
//! println!("{}", config.to_json_pretty().unwrap());
//! ```

pub mod build_config;
pub mod compatibility;
pub mod coordinate;
pub mod declaration;
pub mod error;
pub mod gradle;
pub mod identifier;
pub mod release;
pub mod resolver;

pub use build_config::BuildConfig;
pub use compatibility::LanguageCompatibility;
pub use declaration::Declaration;
pub use error::ConfigError;
pub use release::{ReleaseMetadata, ReleaseMetadataProvider};
pub use resolver::{resolve, ResolveJob, Resolver, ResolverPolicy};
