use crate::domain::model::FilterStats;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Why a run stopped without writing a worklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// Every row was still marked as never having signed in.
    NoSignedInUsers,
    /// Nothing survived exclusion and email validation.
    NoValidEmails,
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyReason::NoSignedInUsers => write!(f, "No users who have logged in found"),
            EmptyReason::NoValidEmails => {
                write!(f, "No valid email addresses found after processing")
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum PurgeError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Missing required columns: {}", .missing.join(", "))]
    SchemaError { missing: Vec<String> },

    /// Carries the counts gathered before the run emptied out.
    #[error("{reason}")]
    EmptyResult { reason: EmptyReason, stats: FilterStats },

    #[error("Could not read exclusion file {}: {source}", .path.display())]
    ExclusionFileError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Schema,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PurgeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PurgeError::CsvError(_) => ErrorCategory::Input,
            PurgeError::IoError(_) | PurgeError::ExclusionFileError { .. } => ErrorCategory::System,
            PurgeError::SchemaError { .. } => ErrorCategory::Schema,
            PurgeError::EmptyResult { .. } => ErrorCategory::Data,
            PurgeError::ConfigValidationError { .. }
            | PurgeError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PurgeError::EmptyResult { .. } => ErrorSeverity::Low,
            PurgeError::ConfigValidationError { .. }
            | PurgeError::InvalidConfigValueError { .. } => ErrorSeverity::Medium,
            PurgeError::CsvError(_) | PurgeError::SchemaError { .. } => ErrorSeverity::High,
            PurgeError::IoError(_) | PurgeError::ExclusionFileError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for batch mode. Empty results are warnings, not failures.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PurgeError::CsvError(_) => "Check that the input is a well-formed delimited export",
            PurgeError::IoError(_) => "Check that the files exist and the directory is writable",
            PurgeError::SchemaError { .. } => {
                "Export the user list again with the email and last sign-in columns included"
            }
            PurgeError::ExclusionFileError { .. } => {
                "Fix the exclusion file path or leave it out to run without exclusions"
            }
            PurgeError::EmptyResult {
                reason: EmptyReason::NoSignedInUsers,
                ..
            } => "Nothing to delete: every account is still marked as never logged in",
            PurgeError::EmptyResult {
                reason: EmptyReason::NoValidEmails,
                ..
            } => "Review the exclusion list and the email column of the export",
            PurgeError::ConfigValidationError { .. } | PurgeError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags and run again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PurgeError::SchemaError { missing } => {
                format!("The CSV file is missing required columns: {}", missing.join(", "))
            }
            PurgeError::EmptyResult { reason, .. } => format!("{}. No output written.", reason),
            PurgeError::ExclusionFileError { .. } => {
                format!("{}. No worklist was written.", self)
            }
            PurgeError::IoError(e) => format!("Could not read or write a file: {}", e),
            PurgeError::CsvError(e) => format!("Error processing CSV: {}", e),
            other => other.to_string(),
        }
    }

    pub fn is_empty_result(&self) -> bool {
        matches!(self, PurgeError::EmptyResult { .. })
    }
}

pub type Result<T> = std::result::Result<T, PurgeError>;
