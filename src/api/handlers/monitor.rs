//! Handlers for run triggers, status and notification tests.

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;

use crate::api::dto::monitor::{RunAcceptedResponse, StatusResponse, TestNotificationResponse};
use crate::domain::entities::RunKind;
use crate::error::AppError;
use crate::state::AppState;

/// Starts a sitemap run over all registered feeds in the background.
///
/// # Endpoint
///
/// `POST /api/monitor/run`
///
/// Returns 202 immediately; progress is only visible in the logs and in the
/// notifications the run sends.
pub async fn run_monitor_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<RunAcceptedResponse>) {
    let monitor = state.monitor.clone();
    tokio::spawn(async move {
        if let Err(e) = monitor.run_scheduled().await {
            tracing::error!(error = %e, "Triggered sitemap run failed");
        }
    });

    accepted(RunKind::Sitemap, "Sitemap run started")
}

/// Starts a search-monitor run over all monitored domains in the background.
///
/// # Endpoint
///
/// `POST /api/search/run`
pub async fn run_search_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<RunAcceptedResponse>) {
    let monitor = state.monitor.clone();
    tokio::spawn(async move {
        if let Err(e) = monitor.run_search_monitor().await {
            tracing::error!(error = %e, "Triggered search run failed");
        }
    });

    accepted(RunKind::Search, "Search monitor run started")
}

fn accepted(run: RunKind, message: &str) -> (StatusCode, Json<RunAcceptedResponse>) {
    (
        StatusCode::ACCEPTED,
        Json(RunAcceptedResponse {
            status: "success",
            run,
            message: message.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }),
    )
}

/// Lists feeds, monitored domains and enabled channels.
///
/// # Endpoint
///
/// `GET /api/status`
pub async fn status_handler(
    State(state): State<AppState>,
) -> Result<Json<StatusResponse>, AppError> {
    let monitor = state.monitor.status().await?;

    Ok(Json(StatusResponse {
        status: "running",
        monitor,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

/// Sends a test message through every enabled channel and reports each outcome.
///
/// # Endpoint
///
/// `POST /api/notifications/test`
///
/// Always 200; failed channels are listed in `result.channels`.
pub async fn test_notification_handler(
    State(state): State<AppState>,
) -> Json<TestNotificationResponse> {
    let result = state.monitor.send_test_message().await;

    Json(TestNotificationResponse {
        status: if result.failed == 0 { "success" } else { "partial" },
        result,
    })
}
