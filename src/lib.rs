pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::app::presenter::ConsolePresenter;
pub use crate::config::{cli::LocalStorage, settings::PipelineSettings, toml_config::TomlConfig};
pub use crate::core::{etl::EtlEngine, pipeline::WorklistPipeline, worker::spawn_run};
pub use crate::domain::model::{InputKind, RunOutcome, RunSummary};
pub use crate::utils::error::{PurgeError, Result};
