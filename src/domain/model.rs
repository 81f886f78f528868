use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::path::PathBuf;

/// One data row of the user export. Field order matches `Table::headers`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub fields: Vec<String>,
}

impl Row {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn get(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }
}

/// Row-oriented view of the export. Construction goes through the loader, which
/// guarantees both mandatory columns exist and records their positions.
#[derive(Debug, Clone)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
    email_index: usize,
    status_index: usize,
}

impl Table {
    pub(crate) fn new(
        headers: Vec<String>,
        rows: Vec<Row>,
        email_index: usize,
        status_index: usize,
    ) -> Self {
        Self {
            headers,
            rows,
            email_index,
            status_index,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn email<'a>(&self, row: &'a Row) -> &'a str {
        row.get(self.email_index)
    }

    pub fn last_sign_in<'a>(&self, row: &'a Row) -> &'a str {
        row.get(self.status_index)
    }

    /// Keeps rows matching `keep` in their original order.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &str) -> bool,
    {
        let (email_index, status_index) = (self.email_index, self.status_index);
        self.rows
            .retain(|row| keep(row.get(email_index), row.get(status_index)));
    }

    pub fn emails(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(move |row| self.email(row))
    }
}

/// Lower-cased addresses that must never end up on the worklist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    emails: HashSet<String>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, email: &str) -> bool {
        self.emails.insert(email.to_lowercase())
    }

    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(&email.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = ExclusionSet::new();
        for email in iter {
            set.insert(email.as_ref());
        }
        set
    }
}

/// A single line of the output worklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    #[serde(rename = "primaryEmail")]
    pub primary_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainInference {
    /// Domain of the first valid email, used to name the output file.
    pub primary: String,
    /// Every distinct domain among the valid emails.
    pub distinct: BTreeSet<String>,
}

impl DomainInference {
    pub fn is_mixed(&self) -> bool {
        self.distinct.len() > 1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub loaded: usize,
    pub never_logged_in: usize,
    pub signed_in: usize,
    pub exclusion_entries: Option<usize>,
    pub excluded: usize,
    pub invalid: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub records: Vec<OutputRecord>,
    pub domain: DomainInference,
    pub stats: FilterStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub output_file: String,
    pub output_dir: PathBuf,
    pub total_emails: usize,
    pub domain: String,
    pub domains: BTreeSet<String>,
    pub stats: FilterStats,
}

/// Terminal status of a run as seen by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Success(RunSummary),
    Empty { message: String },
    Failed { message: String, exit_code: i32 },
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Success(_) | RunOutcome::Empty { .. } => 0,
            RunOutcome::Failed { exit_code, .. } => *exit_code,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Loaded,
    SignedInFiltered,
    ExclusionsApplied,
    Validated,
    DomainResolved,
    Written,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Loaded => "loaded",
            RunPhase::SignedInFiltered => "filtered (login status)",
            RunPhase::ExclusionsApplied => "filtered (exclusions)",
            RunPhase::Validated => "validated",
            RunPhase::DomainResolved => "domain resolved",
            RunPhase::Written => "written",
        };
        f.write_str(name)
    }
}

/// Which file the presenter is being asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    UserTable,
    ExclusionList,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusion_set_collapses_case_duplicates() {
        let set: ExclusionSet = ["A@X.com", "a@x.com", "b@x.com"].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains("a@X.COM"));
    }

    #[test]
    fn test_row_get_pads_missing_fields() {
        let row = Row::new(["only"]);
        assert_eq!(row.get(0), "only");
        assert_eq!(row.get(3), "");
    }
}
