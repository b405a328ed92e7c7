//! # e2g
//!
//! Converts Excellon drill files, as written by PCB CAD tools, into G-code
//! drilling programs for CNC mills.
//!
//! ## Architecture
//!
//! e2g is organized as a workspace with multiple crates:
//!
//! 1. **e2g-core** - Errors, warnings, measurement system, conversion listener
//! 2. **e2g-settings** - Drill settings and config file persistence
//! 3. **e2g-camtools** - Excellon tokenizer, transpiler, and file converter
//! 4. **e2g** - Command line binary that wires the crates together

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub mod cli;
pub mod reporter;

pub use cli::{Args, Verbosity};
pub use reporter::ConsoleReporter;

pub use e2g_camtools::{
    convert_str, default_output_path, ConversionSummary, ExcellonConverter, ExcellonTranspiler,
};
pub use e2g_core::{ConversionError, ConversionListener, ConversionWarning, MeasurementSystem};
pub use e2g_settings::{Config, DrillSettings, OutputSettings, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("E2G_BUILD_DATE");

/// Exit code for a settings file that cannot be loaded
pub const EXIT_CONFIG_ERROR: u8 = 4;

/// Log filter for `verbosity`
///
/// Non-empty, valid `rust_log` directives replace the level chosen by
/// `verbosity`.
fn log_filter(verbosity: Verbosity, rust_log: Option<&str>) -> EnvFilter {
    let level = match verbosity {
        Verbosity::Quiet => LevelFilter::ERROR,
        Verbosity::Normal => LevelFilter::WARN,
        Verbosity::Verbose => LevelFilter::DEBUG,
    };

    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| {
            EnvFilter::builder()
                .with_default_directive(level.into())
                .parse_lossy("")
        })
}

/// Initialize logging
///
/// Logs go to stderr so they never mix with the console report. When
/// `RUST_LOG` is set it takes precedence over the level chosen by
/// `verbosity`.
pub fn init_logging(verbosity: Verbosity, json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = log_filter(verbosity, rust_log.as_deref());

    if json {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .context("Failed to initialize logging")?;
    } else {
        let fmt_layer = fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(verbosity == Verbosity::Verbose)
            .with_level(true)
            .without_time();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .context("Failed to initialize logging")?;
    }

    Ok(())
}

/// Run one conversion as described by `args` and return the exit code
///
/// `0` on success, otherwise the code of the error (see
/// [`ConversionError::exit_code`] and [`EXIT_CONFIG_ERROR`]).
pub fn run(args: &Args) -> u8 {
    let reporter = ConsoleReporter::new(args.quiet);
    reporter.banner();

    match convert(args, reporter) {
        Ok(summary) => {
            reporter.success(&summary);
            0
        }
        Err(error) => {
            reporter.failure(&error);
            exit_code(&error)
        }
    }
}

fn convert(args: &Args, reporter: ConsoleReporter) -> anyhow::Result<ConversionSummary> {
    let mut config = load_config(args.config.as_deref())?;
    if args.strict {
        config.output.strict = true;
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));
    reporter.paths(&args.input, &output);

    let converter = ExcellonConverter::new(config).with_listener(Arc::new(reporter));
    let summary = converter
        .convert_file(&args.input, &output)
        .with_context(|| format!("Converting {}", args.input.display()))?;

    Ok(summary)
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = Config::resolve(path).context("Failed to load settings")?;
    tracing::debug!("Drill settings: {:?}", config.drill);
    Ok(config)
}

/// Exit code for an error returned by a conversion
pub fn exit_code(error: &anyhow::Error) -> u8 {
    if let Some(conversion) = error.downcast_ref::<ConversionError>() {
        conversion.exit_code()
    } else if error.downcast_ref::<SettingsError>().is_some() {
        EXIT_CONFIG_ERROR
    } else {
        1
    }
}
