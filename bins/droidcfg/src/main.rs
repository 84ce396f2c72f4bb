//! droidcfg CLI
//!
//! Resolves the build configuration of a Flutter Android application
//! module and hands the validated result to the build tool.

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use droidcfg_android::release::{
    FixedMetadata, LocalPropertiesMetadata, PubspecMetadata, FLUTTER_DEFAULT_VERSION_CODE,
    FLUTTER_DEFAULT_VERSION_NAME,
};
use droidcfg_android::{
    gradle, BuildConfig, Declaration, ReleaseMetadata, ReleaseMetadataProvider, ResolveJob,
    Resolver, ResolverPolicy,
};
use droidcfg_cli::output::{self, format_count, Status};
use droidcfg_core::config::Config;
use droidcfg_core::error::{exit_codes, Error, ErrorReport};
use droidcfg_telemetry::{level_for_verbosity, TelemetryConfig};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "droidcfg")]
#[command(about = "Validate and normalize Flutter Android build configurations")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve declarations into build configurations
    Resolve {
        /// Declarations (.toml, .json or .gradle.kts)
        #[arg(required = true)]
        declarations: Vec<PathBuf>,
        #[command(flatten)]
        metadata: MetadataArgs,
        /// Output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
        /// Write the resolved configuration as JSON to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate declarations without emitting a configuration
    Check {
        /// Declarations (.toml, .json or .gradle.kts)
        #[arg(required = true)]
        declarations: Vec<PathBuf>,
        #[command(flatten)]
        metadata: MetadataArgs,
    },

    /// Convert a build.gradle.kts into a TOML declaration
    Import {
        /// Gradle Kotlin DSL script
        script: PathBuf,
        /// Write the declaration to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve a declaration and emit an equivalent build.gradle.kts
    Render {
        /// Declaration (.toml, .json or .gradle.kts)
        declaration: PathBuf,
        #[command(flatten)]
        metadata: MetadataArgs,
        /// Write the script to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Where versionCode/versionName come from
#[derive(Args, Debug, Clone)]
struct MetadataArgs {
    /// Release versionCode
    #[arg(long, requires = "version_name", conflicts_with_all = ["pubspec", "local_properties"])]
    version_code: Option<u32>,

    /// Release versionName
    #[arg(long, requires = "version_code")]
    version_name: Option<String>,

    /// Read the version from a pubspec.yaml
    #[arg(long, conflicts_with = "local_properties")]
    pubspec: Option<PathBuf>,

    /// Read flutter.versionCode/flutter.versionName from a local.properties
    #[arg(long)]
    local_properties: Option<PathBuf>,
}

impl MetadataArgs {
    fn provider(&self) -> Box<dyn ReleaseMetadataProvider> {
        match (&self.version_code, &self.version_name, &self.pubspec, &self.local_properties) {
            (Some(code), Some(name), _, _) => {
                Box::new(FixedMetadata(ReleaseMetadata::new(*code, name.clone())))
            }
            (_, _, Some(path), _) => Box::new(PubspecMetadata::new(path)),
            (_, _, _, Some(path)) => Box::new(LocalPropertiesMetadata::new(path)),
            _ => {
                tracing::warn!("No release metadata given; using the Flutter defaults");
                Box::new(FixedMetadata(ReleaseMetadata::new(
                    FLUTTER_DEFAULT_VERSION_CODE,
                    FLUTTER_DEFAULT_VERSION_NAME,
                )))
            }
        }
    }

    fn load(&self) -> droidcfg_core::Result<ReleaseMetadata> {
        let provider = self.provider();
        tracing::debug!(source = %provider.describe(), "Reading release metadata");
        provider.release_metadata()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn from_config(value: &str) -> Self {
        match value {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            output::print_error(&e);
            std::process::exit(e.exit_code());
        }
    };

    droidcfg_telemetry::init_with_config(TelemetryConfig {
        log_level: level_for_verbosity(&config.schema.logging.level, cli.verbose, cli.quiet),
        json: config.schema.logging.json,
        ..TelemetryConfig::default()
    })?;

    let resolver = Resolver::new(ResolverPolicy::from(&config.schema.resolver));

    let exit_code = match cli.command {
        Commands::Resolve {
            declarations,
            metadata,
            format,
            output,
        } => {
            let format =
                format.unwrap_or_else(|| OutputFormat::from_config(&config.schema.output.format));
            run_resolve(&resolver, &declarations, &metadata, format, output.as_deref(), cli.quiet)
        }
        Commands::Check {
            declarations,
            metadata,
        } => run_check(&resolver, &declarations, &metadata, cli.quiet),
        Commands::Import { script, output } => run_import(&script, output.as_deref()),
        Commands::Render {
            declaration,
            metadata,
            output,
        } => run_render(&resolver, &declaration, &metadata, output.as_deref()),
    };

    std::process::exit(exit_code);
}

/// Load declarations and release metadata, then resolve everything
///
/// Returns the resolved configurations in input order, or every failure
/// in input order.
fn resolve_paths(
    resolver: &Resolver,
    paths: &[PathBuf],
    metadata: &MetadataArgs,
) -> std::result::Result<Vec<(PathBuf, BuildConfig)>, Vec<Error>> {
    let metadata = metadata.load().map_err(|e| vec![e])?;

    let mut jobs = Vec::with_capacity(paths.len());
    for path in paths {
        droidcfg_telemetry::span!("load", path = %path.display());
        let declaration = Declaration::load(path).map_err(|e| vec![e])?;
        jobs.push(ResolveJob {
            declaration,
            metadata: metadata.clone(),
        });
    }

    let mut resolved = Vec::with_capacity(jobs.len());
    let mut failures = Vec::new();
    for (path, result) in paths.iter().zip(resolver.resolve_all(&jobs)) {
        match result {
            Ok(config) => resolved.push((path.clone(), config)),
            Err(err) => {
                failures.push(Error::from(err).with_context(format!("In {}", path.display())))
            }
        }
    }

    if failures.is_empty() {
        Ok(resolved)
    } else {
        Err(failures)
    }
}

/// Report failures in the requested format; the exit code is the first failure's
fn fail_all(errors: &[Error], format: OutputFormat) -> i32 {
    match format {
        OutputFormat::Text => errors.iter().for_each(output::print_error),
        OutputFormat::Json => {
            let reports: Vec<ErrorReport> = errors.iter().map(Error::to_report).collect();
            let json = match reports.as_slice() {
                [single] => serde_json::to_string_pretty(single),
                many => serde_json::to_string_pretty(many),
            };
            match json {
                Ok(json) => println!("{}", json),
                Err(_) => errors.iter().for_each(output::print_error),
            }
        }
    }
    errors
        .first()
        .map_or(exit_codes::FAILURE, Error::exit_code)
}

fn fail(err: &Error) -> i32 {
    fail_all(std::slice::from_ref(err), OutputFormat::Text)
}

fn run_resolve(
    resolver: &Resolver,
    paths: &[PathBuf],
    metadata: &MetadataArgs,
    format: OutputFormat,
    output_path: Option<&Path>,
    quiet: bool,
) -> i32 {
    let resolved = match resolve_paths(resolver, paths, metadata) {
        Ok(resolved) => resolved,
        Err(errors) => return fail_all(&errors, format),
    };

    let configs: Vec<&BuildConfig> = resolved.iter().map(|(_, c)| c).collect();
    let json = match configs.as_slice() {
        [single] => serde_json::to_string_pretty(single),
        many => serde_json::to_string_pretty(many),
    };
    let json = match json {
        Ok(json) => json,
        Err(e) => return fail_all(&[Error::from(e)], format),
    };

    if let Some(path) = output_path {
        if let Err(e) = std::fs::write(path, format!("{}\n", json)) {
            let err = Error::from(e).with_context(format!("Writing {}", path.display()));
            return fail_all(&[err], format);
        }
    }

    match format {
        OutputFormat::Json if output_path.is_none() => println!("{}", json),
        OutputFormat::Json => {}
        OutputFormat::Text => {
            if !quiet {
                for (path, config) in &resolved {
                    print_summary(path, config);
                    output::print_warnings(resolver.lint(config).warnings());
                }
                if let Some(path) = output_path {
                    Status::success(&format!(
                        "Wrote {} to {}",
                        format_count(resolved.len(), "configuration", "configurations"),
                        path.display()
                    ));
                }
            }
        }
    }

    exit_codes::SUCCESS
}

fn print_summary(path: &Path, config: &BuildConfig) {
    Status::header(&format!("{} ({})", config.application_id(), path.display()));
    Status::row("namespace", config.namespace());
    Status::row(
        "sdk (min/target/compile)",
        &format!(
            "{} / {} / {}",
            config.min_sdk_version(),
            config.target_sdk_version(),
            config.compile_sdk_version()
        ),
    );
    Status::row("native toolchain", config.native_toolchain_version());
    Status::row("compatibility", &config.language_compatibility().source);
    if let Some(jvm_target) = config.jvm_target() {
        Status::row("jvm target", jvm_target);
    }
    Status::row(
        "version",
        &format!("{} ({})", config.version_name(), config.version_code()),
    );
    for (variant, signing_config) in config.signing_assignment() {
        Status::row(&format!("signing: {}", variant), signing_config);
    }
    for (coordinate, version) in config.dependency_overrides() {
        Status::row(&format!("force: {}", coordinate), &version.cyan().to_string());
    }
    Status::row("source root", &config.source_root().display().to_string());
}

fn run_check(resolver: &Resolver, paths: &[PathBuf], metadata: &MetadataArgs, quiet: bool) -> i32 {
    let resolved = match resolve_paths(resolver, paths, metadata) {
        Ok(resolved) => resolved,
        Err(errors) => return fail_all(&errors, OutputFormat::Text),
    };

    if !quiet {
        for (path, config) in &resolved {
            output::print_warnings(resolver.lint(config).warnings());
            Status::success(&format!("{}: {}", path.display(), config.application_id()));
        }
        Status::success(&format!(
            "{} valid",
            format_count(resolved.len(), "declaration", "declarations")
        ));
    }
    exit_codes::SUCCESS
}

fn run_import(script: &Path, output_path: Option<&Path>) -> i32 {
    let toml = match Declaration::load(script).and_then(|d| d.to_toml_string()) {
        Ok(toml) => toml,
        Err(e) => return fail(&e),
    };
    emit(&toml, output_path)
}

fn run_render(
    resolver: &Resolver,
    path: &Path,
    metadata: &MetadataArgs,
    output_path: Option<&Path>,
) -> i32 {
    let resolved = match resolve_paths(resolver, &[path.to_path_buf()], metadata) {
        Ok(resolved) => resolved,
        Err(errors) => return fail_all(&errors, OutputFormat::Text),
    };
    let Some((_, config)) = resolved.first() else {
        return exit_codes::FAILURE;
    };
    emit(&gradle::render_kts(config), output_path)
}

fn emit(content: &str, output_path: Option<&Path>) -> i32 {
    match output_path {
        Some(path) => match std::fs::write(path, content) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Wrote output");
                exit_codes::SUCCESS
            }
            Err(e) => fail(&Error::from(e).with_context(format!("Writing {}", path.display()))),
        },
        None => {
            print!("{}", content);
            exit_codes::SUCCESS
        }
    }
}
