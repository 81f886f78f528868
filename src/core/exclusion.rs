use crate::core::email::{find_email, is_valid_email};
use crate::domain::model::ExclusionSet;

/// Builds the exclusion set from free text, one candidate per line.
///
/// A line contributes the first address embedded in it; a line that is itself
/// a valid address is taken whole. Lines with neither are ignored. Entries are
/// lower-cased, so duplicates differing only in case collapse.
pub fn parse_exclusions(content: &str) -> ExclusionSet {
    let mut set = ExclusionSet::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(email) = find_email(line) {
            set.insert(email);
        } else if is_valid_email(line) {
            set.insert(line);
        } else {
            tracing::debug!("No email address found in exclusion line: {}", line);
        }
    }

    set
}
