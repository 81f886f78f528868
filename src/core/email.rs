//! Syntactic email checks and output-domain inference.

use crate::domain::model::DomainInference;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Full-field email pattern, anchored at both ends.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

/// Same pattern, unanchored, for pulling an address out of free text.
static EMBEDDED_EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email regex")
});

/// Anything outside this set is dropped from a domain before it becomes a file name.
static UNSAFE_DOMAIN_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]").expect("valid domain regex"));

pub const UNKNOWN_DOMAIN: &str = "unknown";

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Leftmost address embedded in `text`, if any.
pub fn find_email(text: &str) -> Option<&str> {
    EMBEDDED_EMAIL_RE.find(text).map(|m| m.as_str())
}

/// Text after the first `@`, up to a second `@` if one exists, reduced to
/// file-name-safe characters. Falls back to `unknown` when there is no `@`.
pub fn extract_domain(email: &str) -> String {
    match email.split('@').nth(1) {
        Some(domain) => UNSAFE_DOMAIN_CHARS_RE.replace_all(domain, "").into_owned(),
        None => UNKNOWN_DOMAIN.to_string(),
    }
}

/// Names the output after the first email's domain and collects every domain seen.
/// Returns `None` for an empty list.
pub fn infer_domain<'a, I>(emails: I) -> Option<DomainInference>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut emails = emails.into_iter();
    let primary = extract_domain(emails.next()?);

    let mut distinct = BTreeSet::new();
    distinct.insert(primary.clone());
    distinct.extend(emails.map(extract_domain));

    Some(DomainInference { primary, distinct })
}
