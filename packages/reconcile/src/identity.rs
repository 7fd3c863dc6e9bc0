//! Identity-key extraction policy.
//!
//! A record's identity is the single stable string used to match it across
//! stores. Boards disagree about where that value lives, so extraction
//! follows a fixed precedence chain, first non-empty wins:
//!
//! 1. `job_id` — the board's explicit identifier
//! 2. `external_id` — identifier assigned by an upstream aggregator
//! 3. the path segment after the last `/` of `url`
//!
//! The chain is encoded here, once. Nothing else in the codebase should
//! reach into these fields directly.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::record::Record;

/// Fields consulted for an explicit identifier, in precedence order.
const EXPLICIT_ID_FIELDS: [&str; 2] = ["job_id", "external_id"];

/// A stable identity key derived from a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IdentityKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

/// Extract the stable identity key for a record.
///
/// Pure function of the input: the same record always yields the same key.
/// Returns `None` when none of the identity fields produce a non-empty
/// value — the caller decides how to handle unidentifiable records
/// (the reconciler excludes and counts them).
pub fn resolve_identity(record: &Record) -> Option<IdentityKey> {
    for field in EXPLICIT_ID_FIELDS {
        if let Some(value) = record.field(field) {
            return Some(IdentityKey(value));
        }
    }

    record
        .field("url")
        .and_then(|url| derive_url_suffix(&url))
        .map(IdentityKey)
}

/// Derive an identity from a URL: the path segment after the final `/`,
/// with query string and fragment stripped. Trailing slashes are ignored
/// so `.../jobs/12345/` and `.../jobs/12345` derive the same key.
fn derive_url_suffix(url: &str) -> Option<String> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let without_query = without_fragment.split('?').next().unwrap_or(without_fragment);
    // Drop the scheme so a bare hostname never masquerades as an identity.
    let rest = without_query
        .split_once("://")
        .map(|(_, r)| r)
        .unwrap_or(without_query);
    let trimmed = rest.trim_end_matches('/');

    let (_, suffix) = trimmed.rsplit_once('/')?;
    let suffix = suffix.trim();
    if suffix.is_empty() {
        return None;
    }
    Some(suffix.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with(fields: &[(&str, &str)]) -> Record {
        let mut record = Record::new();
        for (name, value) in fields {
            record.set(*name, *value);
        }
        record
    }

    #[test]
    fn job_id_wins_over_url_suffix() {
        let record = record_with(&[
            ("job_id", "X"),
            ("url", "https://boards.example.com/acme/jobs/Y"),
        ]);
        assert_eq!(resolve_identity(&record), Some(IdentityKey::from("X")));
    }

    #[test]
    fn external_id_wins_over_url() {
        let record = record_with(&[
            ("external_id", "ext-42"),
            ("url", "https://example.com/jobs/99"),
        ]);
        assert_eq!(resolve_identity(&record), Some(IdentityKey::from("ext-42")));
    }

    #[test]
    fn empty_job_id_falls_through_to_external_id() {
        let record = record_with(&[("job_id", "   "), ("external_id", "ext-7")]);
        assert_eq!(resolve_identity(&record), Some(IdentityKey::from("ext-7")));
    }

    #[test]
    fn numeric_job_id_resolves() {
        let record = Record::new().with_field("job_id", 12345);
        assert_eq!(resolve_identity(&record), Some(IdentityKey::from("12345")));
    }

    #[test]
    fn url_suffix_is_derived_when_ids_missing() {
        let record = record_with(&[("url", "https://example.com/careers/senior-rust-dev-881")]);
        assert_eq!(
            resolve_identity(&record),
            Some(IdentityKey::from("senior-rust-dev-881"))
        );
    }

    #[test]
    fn url_suffix_ignores_trailing_slash_query_and_fragment() {
        for url in [
            "https://example.com/jobs/881/",
            "https://example.com/jobs/881?utm_source=feed",
            "https://example.com/jobs/881#apply",
            "https://example.com/jobs/881/?ref=x#top",
        ] {
            let record = record_with(&[("url", url)]);
            assert_eq!(
                resolve_identity(&record),
                Some(IdentityKey::from("881")),
                "url: {url}"
            );
        }
    }

    #[test]
    fn bare_hostname_url_is_unidentifiable() {
        for url in ["https://example.com", "https://example.com/", "example.com"] {
            let record = record_with(&[("url", url)]);
            assert_eq!(resolve_identity(&record), None, "url: {url}");
        }
    }

    #[test]
    fn record_without_identity_fields_is_unidentifiable() {
        let record = record_with(&[("title", "Backend Engineer"), ("company", "Acme")]);
        assert_eq!(resolve_identity(&record), None);
    }

    #[test]
    fn resolution_is_deterministic() {
        let record = record_with(&[("job_id", "J-1"), ("url", "https://e.com/jobs/J-2")]);
        let first = resolve_identity(&record);
        let second = resolve_identity(&record);
        assert_eq!(first, second);
    }
}
