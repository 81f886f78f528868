use crate::core::email::is_valid_email;
use crate::domain::model::{ExclusionSet, Table};

/// Keeps rows whose last sign-in is not exactly `never_logged_in`.
/// Returns the number of rows removed.
pub fn retain_signed_in(table: &mut Table, never_logged_in: &str) -> usize {
    let before = table.len();
    table.retain(|_, status| status != never_logged_in);
    before - table.len()
}

/// Drops rows whose lower-cased email is in `exclusions`. Returns the number removed.
pub fn remove_excluded(table: &mut Table, exclusions: &ExclusionSet) -> usize {
    if exclusions.is_empty() {
        return 0;
    }
    let before = table.len();
    table.retain(|email, _| !exclusions.contains(email));
    before - table.len()
}

/// Splits the table's emails into valid ones (in row order) and rejected values.
pub fn partition_valid_emails(table: &Table) -> (Vec<String>, Vec<String>) {
    let mut valid = Vec::new();
    let mut invalid = Vec::new();

    for email in table.emails() {
        if is_valid_email(email) {
            valid.push(email.to_string());
        } else {
            invalid.push(email.to_string());
        }
    }

    (valid, invalid)
}
