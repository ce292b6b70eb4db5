//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the SheetDupe application.
///
/// - 0: Success (completed normally, findings written)
/// - 1: General error (unexpected failure, or every input file failed)
/// - 2: No findings (completed normally, nothing to report)
/// - 3: Partial success (some input files could not be processed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: Duplicates or repeated values were found and written.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// No findings: Processing completed but nothing was flagged.
    NoFindings = 2,
    /// Partial success: Some input files failed to process.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "SD000",
            Self::GeneralError => "SD001",
            Self::NoFindings => "SD002",
            Self::PartialSuccess => "SD003",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "SD001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// The chain of underlying causes, outermost first
    pub causes: Vec<String>,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: err.to_string(),
            causes: err.chain().skip(1).map(ToString::to_string).collect(),
        }
    }
}
