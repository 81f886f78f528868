use crate::core::Pipeline;
use crate::domain::model::{FilterStats, RunOutcome, RunSummary};
use crate::domain::ports::StatusSink;
use crate::utils::error::{PurgeError, Result};
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    fn status(&self, sink: &dyn StatusSink, line: String) {
        tracing::info!("{}", line);
        sink.emit_status(&line);
    }

    fn warn(&self, sink: &dyn StatusSink, line: String) {
        tracing::warn!("{}", line);
        sink.emit_status(&line);
    }

    fn report_filters(&self, sink: &dyn StatusSink, stats: &FilterStats) {
        self.status(
            sink,
            format!(
                "Phase 1: Filtered {} rows (kept {} users who have logged in)",
                stats.never_logged_in, stats.signed_in
            ),
        );
        if let Some(entries) = stats.exclusion_entries {
            self.status(sink, format!("Loaded {} emails for exclusion", entries));
            if entries > 0 {
                self.status(
                    sink,
                    format!("Phase 2: Excluded {} emails from TXT file", stats.excluded),
                );
            }
        }
        for email in &stats.invalid {
            self.warn(sink, format!("Warning: Invalid email format skipped: {}", email));
        }
        if !stats.invalid.is_empty() {
            self.status(
                sink,
                format!("Skipped {} invalid email addresses", stats.invalid.len()),
            );
        }
    }

    /// Runs load, filter, validate and write, reporting progress to `sink`.
    pub async fn run(&self, sink: &dyn StatusSink) -> Result<RunSummary> {
        self.status(sink, "Starting processing...".to_string());
        self.monitor.log_stats("Start");

        let table = self.pipeline.extract().await?;
        self.status(sink, format!("Loaded {} rows from CSV", table.len()));
        self.monitor.log_stats("Extract");

        let result = match self.pipeline.transform(table).await {
            Ok(result) => result,
            Err(e) => {
                if let PurgeError::EmptyResult { stats, .. } = &e {
                    self.report_filters(sink, stats);
                }
                return Err(e);
            }
        };
        self.report_filters(sink, &result.stats);

        let domain = &result.domain;
        self.status(sink, format!("Detected domain: {}", domain.primary));
        if domain.is_mixed() {
            let all: Vec<&str> = domain.distinct.iter().map(String::as_str).collect();
            self.warn(
                sink,
                format!("Warning: Multiple domains detected: {}", all.join(", ")),
            );
            self.warn(sink, format!("Using primary domain: {}", domain.primary));
        }
        self.monitor.log_stats("Transform");

        let output_path = self.pipeline.load(&result).await?;
        self.status(sink, format!("Output saved to: {}", output_path.display()));
        self.status(sink, format!("Total emails in output: {}", result.records.len()));
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        let output_file = output_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let output_dir = output_path
            .parent()
            .map(|dir| dir.to_path_buf())
            .unwrap_or_default();

        Ok(RunSummary {
            output_file,
            output_dir,
            output_path,
            total_emails: result.records.len(),
            domain: result.domain.primary.clone(),
            domains: result.domain.distinct.clone(),
            stats: result.stats.clone(),
        })
    }

    /// Like `run`, but folds every failure into a terminal outcome and hands it to `sink`.
    pub async fn execute(&self, sink: &dyn StatusSink) -> RunOutcome {
        let outcome = match self.run(sink).await {
            Ok(summary) => {
                self.status(sink, "Processing completed successfully!".to_string());
                RunOutcome::Success(summary)
            }
            Err(e) if e.is_empty_result() => {
                tracing::warn!("{}", e);
                RunOutcome::Empty {
                    message: e.user_friendly_message(),
                }
            }
            Err(e) => {
                tracing::error!(
                    "❌ Processing failed: {} (Category: {:?}, Severity: {:?})",
                    e,
                    e.category(),
                    e.severity()
                );
                tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
                sink.emit_status(&format!("Error: {}", e));
                if matches!(e, PurgeError::ExclusionFileError { .. }) {
                    sink.emit_status("Stopped without writing a worklist: the exclusion list must be readable");
                }
                RunOutcome::Failed {
                    message: format!("{}\n💡 {}", e.user_friendly_message(), e.recovery_suggestion()),
                    exit_code: e.exit_code(),
                }
            }
        };

        sink.emit_terminal(&outcome);
        outcome
    }
}
