//! DTOs for run triggers, status and notification tests.

use crate::domain::entities::{DispatchResult, MonitorStatus, RunKind};
use serde::Serialize;

/// Returned immediately when a run is started in the background.
#[derive(Debug, Serialize)]
pub struct RunAcceptedResponse {
    pub status: &'static str,
    pub run: RunKind,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub monitor: MonitorStatus,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct TestNotificationResponse {
    pub status: &'static str,
    pub result: DispatchResult,
}
