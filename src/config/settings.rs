use crate::config::toml_config::TomlConfig;
use crate::core::ConfigProvider;
use crate::utils::error::{PurgeError, Result};
use crate::utils::validation::{
    validate_delimiter, validate_file_name_fragment, validate_non_empty_string, validate_path,
    Validate,
};
use std::path::{Path, PathBuf};

pub const DEFAULT_EMAIL_COLUMN: &str = "Email Address [Required]";
pub const DEFAULT_STATUS_COLUMN: &str = "Last Sign In [READ ONLY]";
pub const DEFAULT_NEVER_LOGGED_IN: &str = "Never logged in";
pub const DEFAULT_OUTPUT_SUFFIX: &str = "-to-delete.csv";

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub input_path: PathBuf,
    pub exclusion_path: Option<PathBuf>,
    pub email_column: String,
    pub status_column: String,
    pub never_logged_in: String,
    pub delimiter: u8,
    pub output_suffix: String,
}

impl PipelineSettings {
    pub fn new(input_path: impl Into<PathBuf>, exclusion_path: Option<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            exclusion_path,
            email_column: DEFAULT_EMAIL_COLUMN.to_string(),
            status_column: DEFAULT_STATUS_COLUMN.to_string(),
            never_logged_in: DEFAULT_NEVER_LOGGED_IN.to_string(),
            delimiter: b',',
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
        }
    }

    /// Overlays every value the file sets.
    pub fn apply_toml(&mut self, config: &TomlConfig) -> Result<()> {
        if let Some(email) = &config.columns.email {
            self.email_column = email.clone();
        }
        if let Some(status) = &config.columns.last_sign_in {
            self.status_column = status.clone();
        }
        if let Some(sentinel) = &config.filter.never_logged_in {
            self.never_logged_in = sentinel.clone();
        }
        if let Some(delimiter) = &config.input.delimiter {
            self.delimiter = validate_delimiter("input.delimiter", delimiter)?;
        }
        if let Some(suffix) = &config.output.suffix {
            self.output_suffix = suffix.clone();
        }
        Ok(())
    }
}

impl Validate for PipelineSettings {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input_path.to_string_lossy())?;
        if let Some(exclusion) = &self.exclusion_path {
            validate_path("exclude", &exclusion.to_string_lossy())?;
        }
        validate_non_empty_string("columns.email", &self.email_column)?;
        validate_non_empty_string("columns.last_sign_in", &self.status_column)?;
        if self.email_column == self.status_column {
            return Err(PurgeError::ConfigValidationError {
                field: "columns".to_string(),
                message: "email and last sign-in columns must differ".to_string(),
            });
        }
        validate_file_name_fragment("output.suffix", &self.output_suffix)?;
        Ok(())
    }
}

impl ConfigProvider for PipelineSettings {
    fn input_path(&self) -> &Path {
        &self.input_path
    }

    fn exclusion_path(&self) -> Option<&Path> {
        self.exclusion_path.as_deref()
    }

    fn email_column(&self) -> &str {
        &self.email_column
    }

    fn status_column(&self) -> &str {
        &self.status_column
    }

    fn never_logged_in(&self) -> &str {
        &self.never_logged_in
    }

    fn delimiter(&self) -> u8 {
        self.delimiter
    }

    fn output_suffix(&self) -> &str {
        &self.output_suffix
    }
}
