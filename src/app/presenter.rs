use crate::domain::model::{InputKind, RunOutcome};
use crate::domain::ports::{Presenter, StatusSink};
use std::io::{BufRead, BufReader, Stderr, Stdin, Stdout, Write};
use std::path::PathBuf;
use std::sync::Mutex;

/// Terminal front end: prompts on the output stream, reads answers line by line.
/// Failures go to a separate error stream.
pub struct ConsolePresenter<R, W, E> {
    input: Mutex<R>,
    output: Mutex<W>,
    errors: Mutex<E>,
    json: bool,
}

impl ConsolePresenter<BufReader<Stdin>, Stdout, Stderr> {
    pub fn stdio(json: bool) -> Self {
        Self::new(
            BufReader::new(std::io::stdin()),
            std::io::stdout(),
            std::io::stderr(),
            json,
        )
    }
}

impl<R, W, E> ConsolePresenter<R, W, E>
where
    R: BufRead + Send,
    W: Write + Send,
    E: Write + Send,
{
    pub fn new(input: R, output: W, errors: E, json: bool) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
            errors: Mutex::new(errors),
            json,
        }
    }

    pub fn into_output(self) -> W {
        self.into_streams().0
    }

    /// Returns the output and error streams.
    pub fn into_streams(self) -> (W, E) {
        let output = self
            .output
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let errors = self
            .errors
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        (output, errors)
    }

    fn write_line(&self, line: &str) {
        write_to(&self.output, line);
    }

    fn write_error(&self, line: &str) {
        write_to(&self.errors, line);
    }

    fn prompt(&self, question: &str) -> Option<String> {
        if let Ok(mut out) = self.output.lock() {
            let _ = write!(out, "{} ", question);
            let _ = out.flush();
        }

        let mut answer = String::new();
        let mut input = self.input.lock().ok()?;
        match input.read_line(&mut answer) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                let answer = answer.trim().trim_matches('"').to_string();
                (!answer.is_empty()).then_some(answer)
            }
        }
    }
}

impl<R, W, E> StatusSink for ConsolePresenter<R, W, E>
where
    R: BufRead + Send,
    W: Write + Send,
    E: Write + Send,
{
    fn emit_status(&self, line: &str) {
        if !self.json {
            self.write_line(line);
        }
    }

    fn emit_terminal(&self, outcome: &RunOutcome) {
        match outcome {
            RunOutcome::Success(summary) if self.json => {
                match serde_json::to_string_pretty(summary) {
                    Ok(json) => self.write_line(&json),
                    Err(e) => tracing::error!("Failed to serialize run summary: {}", e),
                }
            }
            RunOutcome::Success(summary) => {
                self.write_line(&format!(
                    "✅ Processing complete!\n\nOutput file: {}\nLocation: {}\nTotal emails: {}",
                    summary.output_file,
                    summary.output_dir.display(),
                    summary.total_emails
                ));
            }
            RunOutcome::Empty { message } => {
                self.write_line(&format!("⚠️  {}", message));
            }
            RunOutcome::Failed { message, .. } => {
                self.write_error(&format!("❌ {}", message));
            }
        }
    }
}

impl<R, W, E> Presenter for ConsolePresenter<R, W, E>
where
    R: BufRead + Send,
    W: Write + Send,
    E: Write + Send,
{
    fn request_input_path(&self, kind: InputKind) -> Option<PathBuf> {
        let question = match kind {
            InputKind::UserTable => "Path to the user export CSV:",
            InputKind::ExclusionList => {
                "Path to a TXT file of emails to exclude (leave blank to skip):"
            }
        };
        self.prompt(question).map(PathBuf::from)
    }
}

fn write_to<W: Write>(stream: &Mutex<W>, line: &str) {
    if let Ok(mut out) = stream.lock() {
        // A closed stream must not take the run down with it.
        let _ = writeln!(out, "{}", line);
        let _ = out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{FilterStats, RunSummary};
    use std::collections::BTreeSet;
    use std::io::Cursor;

    fn summary() -> RunSummary {
        RunSummary {
            output_path: PathBuf::from("/in/x.com-to-delete.csv"),
            output_file: "x.com-to-delete.csv".to_string(),
            output_dir: PathBuf::from("/in"),
            total_emails: 2,
            domain: "x.com".to_string(),
            domains: BTreeSet::from(["x.com".to_string()]),
            stats: FilterStats::default(),
        }
    }

    #[test]
    fn test_prompts_for_paths() {
        let presenter = ConsolePresenter::new(
            Cursor::new("  \"/data/users.csv\" \n\n"),
            Vec::new(),
            Vec::<u8>::new(),
            false,
        );

        assert_eq!(
            presenter.request_input_path(InputKind::UserTable),
            Some(PathBuf::from("/data/users.csv"))
        );
        assert_eq!(presenter.request_input_path(InputKind::ExclusionList), None);
        assert_eq!(presenter.request_input_path(InputKind::ExclusionList), None);

        let output = String::from_utf8(presenter.into_output()).unwrap();
        assert!(output.contains("Path to the user export CSV:"));
    }

    #[test]
    fn test_success_summary_text() {
        let presenter = ConsolePresenter::new(Cursor::new(""), Vec::new(), Vec::<u8>::new(), false);
        presenter.emit_status("Loaded 3 rows from CSV");
        presenter.emit_terminal(&RunOutcome::Success(summary()));

        let output = String::from_utf8(presenter.into_output()).unwrap();
        assert!(output.starts_with("Loaded 3 rows from CSV\n"));
        assert!(output.contains("Output file: x.com-to-delete.csv"));
        assert!(output.contains("Total emails: 2"));
    }

    #[test]
    fn test_json_mode_prints_only_summary() {
        let presenter = ConsolePresenter::new(Cursor::new(""), Vec::new(), Vec::<u8>::new(), true);
        presenter.emit_status("Loaded 3 rows from CSV");
        presenter.emit_terminal(&RunOutcome::Success(summary()));

        let output = String::from_utf8(presenter.into_output()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["domain"], "x.com");
        assert_eq!(value["total_emails"], 2);
    }

    #[test]
    fn test_failure_goes_to_error_stream() {
        let presenter = ConsolePresenter::new(Cursor::new(""), Vec::new(), Vec::<u8>::new(), false);
        presenter.emit_status("Starting processing...");
        presenter.emit_terminal(&RunOutcome::Failed {
            message: "Missing required columns: Last Sign In [READ ONLY]".to_string(),
            exit_code: 1,
        });

        let (output, errors) = presenter.into_streams();
        let output = String::from_utf8(output).unwrap();
        let errors = String::from_utf8(errors).unwrap();
        assert_eq!(output, "Starting processing...\n");
        assert_eq!(errors, "❌ Missing required columns: Last Sign In [READ ONLY]\n");
    }

    #[test]
    fn test_empty_outcome_is_a_warning_on_output() {
        let presenter = ConsolePresenter::new(Cursor::new(""), Vec::new(), Vec::<u8>::new(), false);
        presenter.emit_terminal(&RunOutcome::Empty {
            message: "No users who have logged in found. No output written.".to_string(),
        });

        let (output, errors) = presenter.into_streams();
        assert!(String::from_utf8(output)
            .unwrap()
            .contains("No users who have logged in found."));
        assert!(errors.is_empty());
    }
}
