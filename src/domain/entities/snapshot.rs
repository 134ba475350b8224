//! Snapshot entities and URL-set diffing.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

/// Which stored copy of a site's URL set to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    /// The most recent resolution that differed from its predecessor.
    Current,
    /// The single-generation backup: the current snapshot before the last change.
    Latest,
    /// The copy written on a given UTC calendar day.
    Dated(NaiveDate),
}

impl SnapshotKind {
    pub fn label(&self) -> String {
        match self {
            SnapshotKind::Current => "current".to_string(),
            SnapshotKind::Latest => "latest".to_string(),
            SnapshotKind::Dated(date) => format!("dated:{}", date.format("%Y%m%d")),
        }
    }
}

/// A stored URL set.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub domain: String,
    pub kind: String,
    pub urls: Vec<String>,
}

/// Outcome of comparing a resolved URL set against the current snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeOutcome {
    pub is_changed: bool,
    pub new_urls: Vec<String>,
}

impl ChangeOutcome {
    pub fn unchanged() -> Self {
        Self {
            is_changed: false,
            new_urls: Vec::new(),
        }
    }
}

/// URLs of `next` that do not occur anywhere in `previous`.
///
/// Order and duplicates of `next` are preserved; membership in `previous` is
/// tested as a set.
///
/// # Examples
///
/// ```
/// use site_bot::domain::entities::diff_urls;
///
/// let previous = vec!["p1".to_string(), "p2".to_string()];
/// let next = vec!["p1".to_string(), "p3".to_string(), "p3".to_string()];
/// assert_eq!(diff_urls(&previous, &next), vec!["p3", "p3"]);
/// ```
pub fn diff_urls(previous: &[String], next: &[String]) -> Vec<String> {
    let known: HashSet<&str> = previous.iter().map(String::as_str).collect();
    next.iter()
        .filter(|url| !known.contains(url.as_str()))
        .cloned()
        .collect()
}
