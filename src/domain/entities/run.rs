//! Reports of monitoring runs and service status.

use super::{DispatchResult, MonitoredDomain};
use crate::error::{AppError, ErrorInfo};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunKind {
    Sitemap,
    Search,
}

/// Outcome of one feed or domain within a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunItem {
    /// Feed URL or monitored domain.
    pub target: String,
    pub success: bool,
    pub new_items: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispatch: Option<DispatchResult>,
}

impl RunItem {
    pub fn completed(target: impl Into<String>, new_items: usize) -> Self {
        Self {
            target: target.into(),
            success: true,
            new_items,
            error: None,
            dispatch: None,
        }
    }

    pub fn failed(target: impl Into<String>, error: &AppError) -> Self {
        Self {
            target: target.into(),
            success: false,
            new_items: 0,
            error: Some(error.to_error_info()),
            dispatch: None,
        }
    }
}

/// Summary of a scheduled sitemap run or a search-monitor run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub kind: RunKind,
    pub started_at: String,
    pub finished_at: String,
    pub items: Vec<RunItem>,
    pub total_new: usize,

    /// End-of-run digest dispatch, present only when something new was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<DispatchResult>,
}

impl RunReport {
    pub fn failed_count(&self) -> usize {
        self.items.iter().filter(|i| !i.success).count()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedStatus {
    pub url: String,
    pub domain: String,
    pub last_update: Option<String>,
}

/// Point-in-time view of what is being monitored and where events go.
#[derive(Debug, Clone, Serialize)]
pub struct MonitorStatus {
    pub feeds: Vec<FeedStatus>,
    pub domains: Vec<MonitoredDomain>,
    pub channels: Vec<&'static str>,
    pub search_configured: bool,
}
