use crate::utils::error::{PurgeError, Result};
use crate::utils::validation::{
    validate_delimiter, validate_file_name_fragment, validate_non_empty_string, Validate,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

static ENV_VAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var regex"));

/// Optional settings file. Every key may be omitted.
///
/// ```toml
/// [columns]
/// email = "Email Address [Required]"
/// last_sign_in = "Last Sign In [READ ONLY]"
///
/// [filter]
/// never_logged_in = "Never logged in"
///
/// [input]
/// delimiter = ","
///
/// [output]
/// suffix = "-to-delete.csv"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TomlConfig {
    pub columns: ColumnsConfig,
    pub filter: FilterConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnsConfig {
    pub email: Option<String>,
    pub last_sign_in: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    pub never_logged_in: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    pub delimiter: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub suffix: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML after replacing `${VAR}` with the environment value.
    /// Unset variables are left as written.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| PurgeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(email) = &self.columns.email {
            validate_non_empty_string("columns.email", email)?;
        }
        if let Some(status) = &self.columns.last_sign_in {
            validate_non_empty_string("columns.last_sign_in", status)?;
        }
        if let Some(delimiter) = &self.input.delimiter {
            validate_delimiter("input.delimiter", delimiter)?;
        }
        if let Some(suffix) = &self.output.suffix {
            validate_file_name_fragment("output.suffix", suffix)?;
        }
        Ok(())
    }
}
