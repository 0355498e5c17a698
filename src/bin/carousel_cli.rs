//! Carousel CLI - validate and bundle CarouselSchema v1 documents
//!
//! Commands: validate, refs, bundle, inspect
//! Reports go to stdout, logs to stderr.
//! Exit codes: 0 success, 1 unusable input, 2 validation failure

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use carousel_core::{
    load_document, BundleError, BundleRequest, Bundler, CarouselConfig, ValidationPolicy,
    ValidationReport, SCHEMA_VERSION,
};

#[derive(Parser)]
#[command(name = "carousel-cli")]
#[command(about = "Carousel CLI - CarouselSchema v1 validator and bundler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file overriding editorial targets and bundle layout
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a schema.json
    Validate {
        file: PathBuf,

        /// Fail on warnings too
        #[arg(long)]
        strict: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the asset paths a schema references
    Refs { file: PathBuf },

    /// Validate and pack a schema with its assets into a zip archive
    Bundle {
        #[arg(short, long)]
        schema: PathBuf,

        #[arg(short, long, default_value = "carousel.zip")]
        output: PathBuf,

        /// Directory containing the assets/ folder (default: next to the schema)
        #[arg(short, long)]
        assets: Option<PathBuf>,

        /// Fail on warnings too
        #[arg(long)]
        strict: bool,
    },

    /// Read back a bundle and validate its schema
    Inspect { archive: PathBuf },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn policy(strict: bool) -> ValidationPolicy {
    if strict {
        ValidationPolicy::Strict
    } else {
        ValidationPolicy::Lenient
    }
}

fn print_json<T: Serialize>(value: &T) -> bool {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            true
        }
        Err(e) => {
            eprintln!("Failed to serialize output: {}", e);
            false
        }
    }
}

fn exit_printed(printed: bool) -> ExitCode {
    if printed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_report(report: &ValidationReport) {
    let errors = report.errors();
    let warnings = report.warnings();
    if !errors.is_empty() {
        println!("ERRORS:");
        for err in &errors {
            println!("  - {}", err);
        }
    }
    if !warnings.is_empty() {
        println!("WARNINGS:");
        for warn in &warnings {
            println!("  - {}", warn);
        }
    }
    if errors.is_empty() && warnings.is_empty() {
        println!("schema.json is valid CarouselSchema v{}", SCHEMA_VERSION);
    }
}

fn exit_for(error: &BundleError) -> ExitCode {
    if error.is_validation_failure() {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}

fn load_config(path: Option<&Path>) -> Result<CarouselConfig, BundleError> {
    match path {
        Some(path) => CarouselConfig::load_from_path(path),
        None => Ok(CarouselConfig::default()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let bundler = Bundler::new(config);

    match cli.command {
        Commands::Validate { file, strict, json } => {
            let document = match load_document(&file) {
                Ok(d) => d,
                Err(e) => {
                    eprintln!("{}", e);
                    return ExitCode::FAILURE;
                }
            };

            let report = bundler.validate(&document);
            if json {
                if !print_json(&report) {
                    return ExitCode::FAILURE;
                }
            } else {
                print_report(&report);
            }

            if report.passes(policy(strict)) {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }

        Commands::Refs { file } => match load_document(&file) {
            Ok(document) => exit_printed(print_json(&bundler.asset_refs(&document))),
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        },

        Commands::Bundle { schema, output, assets, strict } => {
            let request = BundleRequest {
                schema_path: schema,
                output_path: output,
                assets_root: assets,
                policy: policy(strict),
            };

            match bundler.bundle(&request) {
                Ok(report) => {
                    for missing in &report.missing {
                        eprintln!("Missing asset (not found): {}", missing);
                    }
                    exit_printed(print_json(&report))
                }
                Err(e) => {
                    let output = serde_json::json!({
                        "success": false,
                        "error": e.to_string(),
                    });
                    println!("{}", output);
                    exit_for(&e)
                }
            }
        }

        Commands::Inspect { archive } => match bundler.inspect(&archive) {
            Ok(summary) => {
                if !print_json(&summary) {
                    ExitCode::FAILURE
                } else if summary.validation.is_valid() {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::from(2)
                }
            }
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        },
    }
}
