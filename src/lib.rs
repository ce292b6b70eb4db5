//! SheetDupe - Duplicate Row Finder for Spreadsheets
//!
//! Classifies the data rows of a spreadsheet or CSV file into exact duplicate
//! rows and rows in which a single value repeats, and writes both sets, sorted,
//! as separate result sheets.

pub mod batch;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod table;

use std::io::Write;

use anyhow::{Context, Result};

use crate::batch::{analyze, BatchOptions, BatchRunner};
use crate::cli::{CheckArgs, Cli, Commands, ReportFormat, ScanArgs};
use crate::config::Config;
use crate::error::ExitCode;
use crate::output::JsonOutput;
use crate::progress::{NoProgress, Progress, ProgressCallback};
use crate::table::load_table;

/// Run the application for parsed CLI arguments.
///
/// # Errors
///
/// Returns an error for configuration problems, a missing input folder, or,
/// for `check`, a file that cannot be processed.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Scan(args) => run_scan(&mut config, args, cli.quiet),
        Commands::Check(args) => run_check(&mut config, args),
    }
}

fn run_scan(config: &mut Config, args: ScanArgs, quiet: bool) -> Result<ExitCode> {
    config.apply_overrides(&args.classify);
    if let Some(format) = args.format {
        config.output_format = format;
    }
    config.validate()?;

    log::debug!(
        "Comparing from column {}, repeat threshold {}, output {}",
        config.columns_to_skip,
        config.min_repeats,
        config.output_format
    );

    let progress: Box<dyn ProgressCallback> = if quiet || args.no_progress {
        Box::new(NoProgress)
    } else {
        Box::new(Progress::new())
    };

    let options = BatchOptions::new(args.input, args.output).with_recursive(args.recursive);
    let report = BatchRunner::new(config, progress.as_ref()).run(&options)?;

    log::info!(
        "Finished {} files in {:.2?}: {} duplicate rows, {} rows with repeated values, {} failed",
        report.files.len() + report.failures.len(),
        report.duration,
        report.duplicate_rows(),
        report.repeat_rows(),
        report.failures.len()
    );

    Ok(report.exit_code())
}

fn run_check(config: &mut Config, args: CheckArgs) -> Result<ExitCode> {
    config.apply_overrides(&args.classify);
    config.validate()?;

    let table = load_table(&args.path)
        .with_context(|| format!("Failed to load {}", args.path.display()))?;
    let (classification, sheets) = analyze(&table, config)
        .with_context(|| format!("Failed to classify {}", args.path.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        ReportFormat::Json => {
            JsonOutput::new(
                &args.path,
                &config.classifier_config(),
                config.sort_column,
                &classification,
                &sheets,
            )
            .write_to(&mut out)?;
        }
        ReportFormat::Text => {
            let stats = &classification.stats;
            writeln!(out, "{}: {} data rows", args.path.display(), stats.total_rows)?;
            writeln!(
                out,
                "  {}: {} rows in {} groups",
                sheets.duplicates.name, stats.duplicate_rows, stats.duplicate_groups
            )?;
            writeln!(out, "  {}: {} rows", sheets.repeats.name, stats.repeat_rows)?;
            for row in &classification.repeats {
                if let Some(value) = classification.repeated_values.get(row) {
                    writeln!(
                        out,
                        "    row {}: '{}' x{}",
                        row, value.value, value.count
                    )?;
                }
            }
        }
    }

    Ok(if classification.is_clean() {
        ExitCode::NoFindings
    } else {
        ExitCode::Success
    })
}
