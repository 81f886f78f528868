pub mod cli;
pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::{settings::PipelineSettings, toml_config::TomlConfig};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_delimiter, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "purge-list")]
#[command(about = "Builds a deletion worklist of signed-in accounts from a user export")]
pub struct CliConfig {
    /// User export CSV; prompted for when omitted
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Text file of emails to keep off the worklist, one per line
    #[arg(short, long)]
    pub exclude: Option<PathBuf>,

    /// Optional TOML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Field delimiter of the user export (overrides the settings file)
    #[arg(long)]
    pub delimiter: Option<String>,

    /// Prompt for the exclusion list too
    #[arg(long)]
    pub interactive: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Print the run summary as JSON")]
    pub json: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Defaults, then the settings file, then command line flags.
    pub fn resolve(&self, input: PathBuf, exclusion: Option<PathBuf>) -> Result<PipelineSettings> {
        let mut settings = PipelineSettings::new(input, exclusion);

        if let Some(path) = &self.config {
            tracing::info!("📁 Loading settings from: {}", path.display());
            let file = TomlConfig::from_file(path)?;
            file.validate()?;
            settings.apply_toml(&file)?;
        }

        if let Some(delimiter) = &self.delimiter {
            settings.delimiter = validate_delimiter("delimiter", delimiter)?;
        }

        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_flags() {
        let config = CliConfig::parse_from([
            "purge-list",
            "--input",
            "users.csv",
            "-e",
            "keep.txt",
            "--delimiter",
            ";",
            "--json",
        ]);

        assert_eq!(config.input, Some(PathBuf::from("users.csv")));
        assert_eq!(config.exclude, Some(PathBuf::from("keep.txt")));
        assert!(config.json);
        assert!(!config.interactive);
    }

    #[test]
    fn test_cli_delimiter_beats_settings_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[input]\ndelimiter = \"\\t\"\n[filter]\nnever_logged_in = \"Never\"\n")
            .unwrap();

        let config = CliConfig {
            config: Some(file.path().to_path_buf()),
            delimiter: Some(";".to_string()),
            ..CliConfig::default()
        };
        let settings = config.resolve(PathBuf::from("users.csv"), None).unwrap();

        assert_eq!(settings.delimiter(), b';');
        assert_eq!(settings.never_logged_in(), "Never");
    }

    #[test]
    fn test_missing_settings_file_is_error() {
        let config = CliConfig {
            config: Some(PathBuf::from("/definitely/not/here.toml")),
            ..CliConfig::default()
        };
        assert!(config.resolve(PathBuf::from("users.csv"), None).is_err());
    }
}
