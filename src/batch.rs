//! Batch processing of an input folder.
//!
//! # Overview
//!
//! For every table file found in the input folder:
//! 1. **Load** the first sheet into a [`Table`]
//! 2. **Classify** rows into duplicates and repeat candidates
//! 3. **Order** both sets and copy them into result sheets
//! 4. **Write** the sheets to the output folder
//!
//! Each file runs in isolation: a failure is logged and recorded in the
//! [`BatchReport`], and processing continues with the next file.
//!
//! Results are named after the full input file name, extension included, so
//! `orders.csv` and `orders.xlsx` never share an output. Two inputs that
//! would still map to the same output are caught before anything is written;
//! the later one is recorded as a failure.
//!
//! # Example
//!
//! ```no_run
//! use sheetdupe::batch::{BatchOptions, BatchRunner};
//! use sheetdupe::config::Config;
//! use sheetdupe::progress::NoProgress;
//!
//! let config = Config::default();
//! let runner = BatchRunner::new(&config, &NoProgress);
//! let report = runner.run(&BatchOptions::new("Input", "Output")).unwrap();
//!
//! println!("{} files processed, {} failed", report.files.len(), report.failures.len());
//! ```

use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use serde::Serialize;
use thiserror::Error;
use walkdir::WalkDir;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::duplicates::{Classification, ClassifyError, RowClassifier};
use crate::error::ExitCode;
use crate::output::{build_sheets, CsvOutput, JsonOutput, ResultSheets, Sheet, XlsxOutput};
use crate::progress::ProgressCallback;
use crate::table::{load_table, Table};

/// Errors that stop a batch before any file is processed.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The input folder does not exist.
    #[error("Input folder '{0}' does not exist")]
    InputNotFound(PathBuf),

    /// The input path is not a folder.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The output folder could not be created.
    #[error("Failed to create output folder {path}: {source}")]
    CreateOutput {
        /// Output folder path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Where to read from and write to.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Folder containing input files
    pub input_dir: PathBuf,
    /// Folder receiving result files
    pub output_dir: PathBuf,
    /// Descend into subfolders
    pub recursive: bool,
}

impl BatchOptions {
    /// Non-recursive options for the given folders.
    #[must_use]
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            recursive: false,
        }
    }

    /// Enable or disable descending into subfolders.
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }
}

/// Outcome of one successfully processed file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Input file
    pub path: PathBuf,
    /// Data rows in the input table
    pub data_rows: usize,
    /// Rows reported as duplicates
    pub duplicate_rows: usize,
    /// Duplicate groups
    pub duplicate_groups: usize,
    /// Rows reported as repeat candidates
    pub repeat_rows: usize,
    /// Files written for this input
    pub outputs: Vec<PathBuf>,
}

impl FileReport {
    /// True if anything was flagged.
    #[must_use]
    pub fn has_findings(&self) -> bool {
        self.duplicate_rows > 0 || self.repeat_rows > 0
    }
}

/// A file that could not be processed.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    /// Input file
    pub path: PathBuf,
    /// Error message including causes
    pub error: String,
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// Files processed successfully, in processing order
    pub files: Vec<FileReport>,
    /// Files that failed
    pub failures: Vec<FileFailure>,
    /// Wall time of the run
    #[serde(skip)]
    pub duration: Duration,
}

impl BatchReport {
    /// Total duplicate rows across all files.
    #[must_use]
    pub fn duplicate_rows(&self) -> usize {
        self.files.iter().map(|f| f.duplicate_rows).sum()
    }

    /// Total repeat candidates across all files.
    #[must_use]
    pub fn repeat_rows(&self) -> usize {
        self.files.iter().map(|f| f.repeat_rows).sum()
    }

    /// Exit code for this run.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        if !self.failures.is_empty() {
            if self.files.is_empty() {
                ExitCode::GeneralError
            } else {
                ExitCode::PartialSuccess
            }
        } else if self.files.iter().any(FileReport::has_findings) {
            ExitCode::Success
        } else {
            ExitCode::NoFindings
        }
    }
}

/// Classify a loaded table and build both result sheets.
///
/// # Errors
///
/// Returns [`ClassifyError`] if the configuration does not fit the table.
pub fn analyze(
    table: &Table,
    config: &Config,
) -> Result<(Classification, ResultSheets), ClassifyError> {
    let classification = RowClassifier::new(config.classifier_config()).classify(table)?;
    let sheets = build_sheets(table, &classification, &config.orderer(), &config.sheets);
    Ok((classification, sheets))
}

/// Find input files in `dir`, sorted by path.
///
/// Files must carry one of the configured extensions. Office lock files
/// (`~$name.xlsx`) are skipped. Unreadable entries are logged and skipped.
///
/// # Errors
///
/// Returns [`BatchError`] if `dir` is missing or not a folder.
pub fn discover_inputs(
    dir: &Path,
    config: &Config,
    recursive: bool,
) -> Result<Vec<PathBuf>, BatchError> {
    if !dir.exists() {
        return Err(BatchError::InputNotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(BatchError::NotADirectory(dir.to_path_buf()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| {
            let lock_file = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("~$"));
            !lock_file && config.accepts_extension(path)
        })
        .collect();

    files.sort();
    Ok(files)
}

/// Runs the load, classify, order and write steps over a folder.
pub struct BatchRunner<'a> {
    config: &'a Config,
    progress: &'a dyn ProgressCallback,
}

impl<'a> BatchRunner<'a> {
    /// Create a runner.
    #[must_use]
    pub fn new(config: &'a Config, progress: &'a dyn ProgressCallback) -> Self {
        Self { config, progress }
    }

    /// Process every input file.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError`] only for folder-level problems; per-file
    /// errors are recorded in the report.
    pub fn run(&self, options: &BatchOptions) -> Result<BatchReport, BatchError> {
        let start = Instant::now();
        let inputs = discover_inputs(&options.input_dir, self.config, options.recursive)?;

        fs::create_dir_all(&options.output_dir).map_err(|source| BatchError::CreateOutput {
            path: options.output_dir.clone(),
            source,
        })?;

        let mut report = BatchReport::default();
        if inputs.is_empty() {
            log::warn!(
                "No input files found in '{}'",
                options.input_dir.display()
            );
            return Ok(report);
        }

        self.progress.on_start(inputs.len());
        let mut claimed: HashSet<PathBuf> = HashSet::new();
        for (idx, path) in inputs.iter().enumerate() {
            let name = display_name(path);
            log::info!("Processing '{}'...", name);
            self.progress.on_file(idx + 1, &name);

            let target = self.output_target(path, &options.input_dir, &options.output_dir);
            let result = if claimed.insert(target.clone()) {
                self.process_file(path, &target)
            } else {
                Err(anyhow::anyhow!(
                    "Output '{}' is already used by another input file",
                    target.display()
                ))
            };

            match result {
                Ok(file_report) => {
                    log::info!(
                        "'{}': {} duplicate rows in {} groups, {} rows with repeated values",
                        name,
                        file_report.duplicate_rows,
                        file_report.duplicate_groups,
                        file_report.repeat_rows
                    );
                    report.files.push(file_report);
                    self.progress.on_file_done(true);
                }
                Err(e) => {
                    log::error!("An error occurred while processing '{}': {:#}", name, e);
                    report.failures.push(FileFailure {
                        path: path.clone(),
                        error: format!("{:#}", e),
                    });
                    self.progress.on_file_done(false);
                }
            }
        }
        self.progress.on_finish();

        report.duration = start.elapsed();
        Ok(report)
    }

    /// Where results for `path` go under the configured output format.
    ///
    /// The input's path relative to `input_root` is re-rooted under
    /// `output_root`. CSV results are a folder of that name, JSON results a
    /// file with `.json` appended, XLSX results a file with `.xlsx` appended
    /// unless the input already is an `.xlsx` file.
    #[must_use]
    pub fn output_target(&self, path: &Path, input_root: &Path, output_root: &Path) -> PathBuf {
        let base = output_base(path, input_root, output_root);
        match self.config.output_format {
            OutputFormat::Csv => base,
            OutputFormat::Json => with_suffix(base, "json"),
            OutputFormat::Xlsx => with_suffix(base, "xlsx"),
        }
    }

    /// Load, classify and write one file to `target`.
    ///
    /// `target` comes from [`BatchRunner::output_target`].
    ///
    /// # Errors
    ///
    /// Returns an error describing the failing step.
    pub fn process_file(&self, path: &Path, target: &Path) -> anyhow::Result<FileReport> {
        let table =
            load_table(path).with_context(|| format!("Failed to load {}", path.display()))?;
        let (classification, sheets) = analyze(&table, self.config)
            .with_context(|| format!("Failed to classify {}", path.display()))?;

        let outputs = match self.config.output_format {
            OutputFormat::Csv => self.write_csv(&sheets, target)?,
            OutputFormat::Xlsx => self.write_xlsx(&sheets, target)?,
            OutputFormat::Json => {
                create_parent(target)?;
                JsonOutput::new(
                    path,
                    &self.config.classifier_config(),
                    self.config.sort_column,
                    &classification,
                    &sheets,
                )
                .write_file(target)
                .with_context(|| format!("Failed to write {}", target.display()))?;
                vec![target.to_path_buf()]
            }
        };

        Ok(FileReport {
            path: path.to_path_buf(),
            data_rows: table.data_row_count(),
            duplicate_rows: classification.stats.duplicate_rows,
            duplicate_groups: classification.stats.duplicate_groups,
            repeat_rows: classification.stats.repeat_rows,
            outputs,
        })
    }

    fn sheets_to_write<'s>(&self, sheets: &'s ResultSheets) -> Vec<&'s Sheet> {
        sheets
            .iter()
            .filter(|sheet| {
                let skip = self.config.skip_empty_outputs && sheet.data_row_count() == 0;
                if skip {
                    log::debug!("Sheet '{}' is empty, not written", sheet.name);
                }
                !skip
            })
            .collect()
    }

    fn write_xlsx(&self, sheets: &ResultSheets, target: &Path) -> anyhow::Result<Vec<PathBuf>> {
        let output = XlsxOutput::new(self.sheets_to_write(sheets));
        if output.sheet_count() == 0 {
            return Ok(Vec::new());
        }
        create_parent(target)?;
        output
            .write_file(target)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        Ok(vec![target.to_path_buf()])
    }

    fn write_csv(&self, sheets: &ResultSheets, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create folder {}", dir.display()))?;

        let mut written = Vec::new();
        for sheet in self.sheets_to_write(sheets) {
            let path = CsvOutput::new(sheet)
                .write_into(dir)
                .with_context(|| format!("Failed to write sheet '{}'", sheet.name))?;
            written.push(path);
        }
        Ok(written)
    }
}

/// Output location for an input file: its path relative to `input_root`,
/// file name and extension included, re-rooted under `output_root`.
fn output_base(path: &Path, input_root: &Path, output_root: &Path) -> PathBuf {
    match path.strip_prefix(input_root) {
        Ok(relative) if relative.file_name().is_some() => output_root.join(relative),
        _ => output_root.join(path.file_name().unwrap_or_else(|| OsStr::new("output"))),
    }
}

/// Append `.extension` unless the name already ends with it.
fn with_suffix(base: PathBuf, extension: &str) -> PathBuf {
    let has_it = base
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|e| e.eq_ignore_ascii_case(extension));
    if has_it {
        return base;
    }
    let mut name = base.into_os_string();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

fn create_parent(target: &Path) -> anyhow::Result<()> {
    let Some(parent) = target.parent() else {
        bail!("No parent folder for {}", target.display());
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create folder {}", parent.display()))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
