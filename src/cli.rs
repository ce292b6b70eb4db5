//! Command-line interface definitions for SheetDupe.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! Global options control verbosity and configuration; subcommands select batch or
//! single-file operation.
//!
//! # Example
//!
//! ```bash
//! # Process every spreadsheet in ./Input and write results to ./Output
//! sheetdupe scan
//!
//! # Custom folders, compare from column 2, flag values seen 4+ times
//! sheetdupe scan ~/sheets -o ~/results --columns-to-skip 2 --min-repeats 4
//!
//! # Inspect a single file and print a JSON report
//! sheetdupe check orders.xlsx --format json
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Find duplicate rows and rows with repeated values in spreadsheets.
///
/// SheetDupe fingerprints every data row over a configurable column range,
/// reports exact duplicate rows, and flags rows in which one value repeats
/// several times.
#[derive(Debug, Parser)]
#[command(name = "sheetdupe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to a TOML configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Report fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for SheetDupe.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Process every table file in a folder
    Scan(ScanArgs),
    /// Classify a single file and print the result
    Check(CheckArgs),
}

/// Classification overrides shared by all subcommands.
#[derive(Debug, Clone, Default, Args)]
pub struct ClassifyArgs {
    /// First compared column, 1-based (columns before it are ignored)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub columns_to_skip: Option<u64>,

    /// Occurrences of one value within a row needed to flag the row
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub min_repeats: Option<u64>,

    /// Column used to order equally sized duplicate groups
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub sort_column: Option<u64>,
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Folder containing input files
    #[arg(value_name = "INPUT_DIR", default_value = "Input")]
    pub input: PathBuf,

    /// Folder receiving result files (created if missing)
    #[arg(short, long, value_name = "OUTPUT_DIR", default_value = "Output")]
    pub output: PathBuf,

    /// Output format for result files
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Descend into subfolders of the input folder
    #[arg(short, long)]
    pub recursive: bool,

    /// Do not show a progress bar
    #[arg(long)]
    pub no_progress: bool,

    #[command(flatten)]
    pub classify: ClassifyArgs,
}

/// Arguments for the check subcommand.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// File to classify
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// How to print the result
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: ReportFormat,

    #[command(flatten)]
    pub classify: ClassifyArgs,
}

/// File format for scan results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One workbook per input file with a worksheet per result sheet
    #[default]
    Xlsx,
    /// One CSV file per result sheet
    Csv,
    /// One JSON report per input file
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Xlsx => write!(f, "xlsx"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Printed format for the check subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable summary
    Text,
    /// Full JSON report
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_help() {
        let result = Cli::try_parse_from(["sheetdupe", "--help"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_scan_defaults() {
        let cli = Cli::try_parse_from(["sheetdupe", "scan"]).unwrap();
        assert_eq!(cli.verbose, 0);
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.input, PathBuf::from("Input"));
                assert_eq!(args.output, PathBuf::from("Output"));
                assert_eq!(args.format, None);
                assert!(!args.recursive);
                assert_eq!(args.classify.columns_to_skip, None);
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn test_cli_parse_scan_with_options() {
        let cli = Cli::try_parse_from([
            "sheetdupe",
            "-v",
            "scan",
            "/in",
            "-o",
            "/out",
            "--format",
            "json",
            "--columns-to-skip",
            "2",
            "--min-repeats",
            "4",
            "--sort-column",
            "5",
            "--recursive",
            "--no-progress",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.input, PathBuf::from("/in"));
                assert_eq!(args.output, PathBuf::from("/out"));
                assert_eq!(args.format, Some(OutputFormat::Json));
                assert_eq!(args.classify.columns_to_skip, Some(2));
                assert_eq!(args.classify.min_repeats, Some(4));
                assert_eq!(args.classify.sort_column, Some(5));
                assert!(args.recursive);
                assert!(args.no_progress);
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn test_output_format_defaults_to_xlsx() {
        assert_eq!(OutputFormat::default(), OutputFormat::Xlsx);
        assert_eq!(OutputFormat::Xlsx.to_string(), "xlsx");

        let cli = Cli::try_parse_from(["sheetdupe", "scan", "-f", "xlsx"]).unwrap();
        match cli.command {
            Commands::Scan(args) => assert_eq!(args.format, Some(OutputFormat::Xlsx)),
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn test_cli_rejects_zero_threshold() {
        let result = Cli::try_parse_from(["sheetdupe", "scan", "--min-repeats", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["sheetdupe", "-v", "-q", "scan"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::try_parse_from(["sheetdupe", "check", "data.xlsx", "-f", "json"]).unwrap();
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.path, PathBuf::from("data.xlsx"));
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_check_requires_file() {
        assert!(Cli::try_parse_from(["sheetdupe", "check"]).is_err());
    }

    #[test]
    fn test_cli_global_config_after_subcommand() {
        let cli =
            Cli::try_parse_from(["sheetdupe", "scan", "--config", "custom.toml", "--json-errors"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(cli.json_errors);
    }
}
