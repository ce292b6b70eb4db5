//! Application configuration management.
//!
//! Settings are layered with [`figment`], lowest priority first:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config PATH`, or the platform config dir's `config.toml`)
//! 3. Environment variables prefixed `SHEETDUPE_` (`__` separates nested keys)
//! 4. CLI flags, applied with [`Config::apply_overrides`]
//!
//! # Example
//!
//! ```toml
//! columns_to_skip = 2
//! min_repeats = 4
//! extensions = ["xlsx"]
//!
//! [sheets]
//! duplicates = "Dupes"
//! repeats = "Repeated"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::{ClassifyArgs, OutputFormat};
use crate::duplicates::classifier::{DEFAULT_COLUMNS_TO_SKIP, DEFAULT_MIN_REPEATS};
use crate::duplicates::{ClassifierConfig, ResultOrderer, DEFAULT_SORT_COLUMN};
use crate::output::SheetNames;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "SHEETDUPE_";

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// A layer could not be parsed or has the wrong shape.
    #[error("Invalid configuration: {0}")]
    Extract(#[from] Box<figment::Error>),

    /// A value is outside its valid range.
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Name of the offending setting
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// I/O error while saving.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error while serializing to TOML.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// First compared column, 1-based
    pub columns_to_skip: usize,
    /// Occurrences of one value within a row needed to flag the row
    pub min_repeats: usize,
    /// Tie-break column for equally sized duplicate groups
    pub sort_column: usize,
    /// File extensions picked up from the input folder
    pub extensions: Vec<String>,
    /// Result file format
    pub output_format: OutputFormat,
    /// Skip writing sheets without data rows (XLSX and CSV)
    pub skip_empty_outputs: bool,
    /// Result sheet names
    pub sheets: SheetNames,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            columns_to_skip: DEFAULT_COLUMNS_TO_SKIP,
            min_repeats: DEFAULT_MIN_REPEATS,
            sort_column: DEFAULT_SORT_COLUMN,
            extensions: vec!["xlsx".to_string(), "csv".to_string()],
            output_format: OutputFormat::default(),
            skip_empty_outputs: false,
            sheets: SheetNames::default(),
        }
    }
}

impl Config {
    /// Load configuration from all layers except CLI flags.
    ///
    /// An explicit `path` must exist; the default path is used only if it does.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a layer cannot be parsed or the result
    /// fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) if !p.exists() => return Err(ConfigError::NotFound(p.to_path_buf())),
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path().filter(|p| p.exists()),
        };

        if let Some(ref f) = file {
            log::debug!("Loading config from {}", f.display());
        }

        let config: Config = Self::figment(file.as_deref())
            .extract()
            .map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// The layered figment: defaults, optional TOML file, environment.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(file) = file {
            figment = figment.merge(Toml::file(file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Apply CLI flag overrides.
    pub fn apply_overrides(&mut self, args: &ClassifyArgs) {
        if let Some(n) = args.columns_to_skip {
            self.columns_to_skip = n as usize;
        }
        if let Some(n) = args.min_repeats {
            self.min_repeats = n as usize;
        }
        if let Some(n) = args.sort_column {
            self.sort_column = n as usize;
        }
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let at_least_one = |field: &'static str, value: usize| {
            if value == 0 {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be at least 1".to_string(),
                })
            } else {
                Ok(())
            }
        };
        at_least_one("columns_to_skip", self.columns_to_skip)?;
        at_least_one("min_repeats", self.min_repeats)?;
        at_least_one("sort_column", self.sort_column)?;

        if self.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                field: "extensions",
                reason: "at least one extension is required".to_string(),
            });
        }
        if self.sheets.duplicates.trim().is_empty() || self.sheets.repeats.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "sheets",
                reason: "sheet names cannot be blank".to_string(),
            });
        }
        if self.sheets.duplicates == self.sheets.repeats {
            return Err(ConfigError::Invalid {
                field: "sheets",
                reason: format!("both sheets are named '{}'", self.sheets.duplicates),
            });
        }
        Ok(())
    }

    /// Classifier settings.
    #[must_use]
    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig::new(self.columns_to_skip, self.min_repeats)
    }

    /// Result orderer for these settings.
    #[must_use]
    pub fn orderer(&self) -> ResultOrderer {
        ResultOrderer::new(self.columns_to_skip, self.sort_column)
    }

    /// True if `path` has one of the configured extensions (case-insensitive).
    #[must_use]
    pub fn accepts_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
    }

    /// Save the configuration as pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if serialization or writing fails.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Default platform-specific config file path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "sheetdupe", "sheetdupe")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
