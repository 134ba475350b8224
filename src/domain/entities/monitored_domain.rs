//! Outcomes of monitored-domain set mutations.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainAddOutcome {
    Added,
    /// The domain was already in the set; nothing was written.
    AlreadyMonitored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainRemoveOutcome {
    Removed,
    /// The domain was not in the set, possibly because a concurrent call
    /// removed it first. Still a success.
    NotMonitored,
}

/// A monitored domain with its last search check, for status reports.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoredDomain {
    pub domain: String,
    pub last_check: Option<String>,
}
