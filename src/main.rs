use clap::Parser;
use purge_list::domain::ports::{Presenter, StatusSink};
use purge_list::utils::logger;
use purge_list::{
    spawn_run, CliConfig, ConsolePresenter, EtlEngine, InputKind, LocalStorage, RunOutcome,
    WorklistPipeline,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting purge-list");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let presenter = ConsolePresenter::stdio(config.json);

    // Without an input path we fall back to asking for both files.
    let interactive = config.interactive || config.input.is_none();
    let input = match config
        .input
        .clone()
        .or_else(|| presenter.request_input_path(InputKind::UserTable))
    {
        Some(path) => path,
        None => {
            tracing::info!("No CSV file selected. Exiting.");
            presenter.emit_status("No CSV file selected. Exiting.");
            return Ok(());
        }
    };
    let exclusion = match config.exclude.clone() {
        Some(path) => Some(path),
        None if interactive => presenter.request_input_path(InputKind::ExclusionList),
        None => None,
    };
    match &exclusion {
        Some(path) => tracing::info!("TXT file selected: {}", path.display()),
        None => tracing::info!("No TXT file selected (skipping exclusions)"),
    }

    let settings = match config.resolve(input, exclusion) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            presenter.emit_terminal(&RunOutcome::Failed {
                message: e.user_friendly_message(),
                exit_code: e.exit_code(),
            });
            std::process::exit(e.exit_code());
        }
    };

    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let pipeline = WorklistPipeline::new(LocalStorage::new(), settings);
    let engine = EtlEngine::new_with_monitoring(pipeline, config.monitor);

    let outcome = spawn_run(engine).forward(&presenter).await;

    let exit_code = outcome.exit_code();
    if exit_code > 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}
