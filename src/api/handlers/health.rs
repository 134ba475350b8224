//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Store reachable
/// - **503 Service Unavailable**: Store unreachable
///
/// Having no notification channel is reported but does not degrade health.
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "service": "site-bot",
///   "version": "0.1.0",
///   "timestamp": "2025-06-01T12:00:00+00:00",
///   "checks": {
///     "store": { "status": "ok", "message": "Store reachable" },
///     "notifications": { "status": "ok", "message": "Enabled: feishu, telegram" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store_check = check_store(&state).await;
    let notification_check = check_notifications(&state);

    let healthy = store_check.status == "ok";

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        service: "site-bot",
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
        checks: HealthChecks {
            store: store_check,
            notifications: notification_check,
        },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_store(state: &AppState) -> CheckStatus {
    if state.store.health_check().await {
        CheckStatus {
            status: "ok".to_string(),
            message: Some("Store reachable".to_string()),
        }
    } else {
        CheckStatus {
            status: "error".to_string(),
            message: Some("Store unreachable".to_string()),
        }
    }
}

fn check_notifications(state: &AppState) -> CheckStatus {
    let channels = state.monitor.dispatcher().channels();
    if channels.is_empty() {
        CheckStatus {
            status: "disabled".to_string(),
            message: Some("No notification channel configured".to_string()),
        }
    } else {
        CheckStatus {
            status: "ok".to_string(),
            message: Some(format!("Enabled: {}", channels.join(", "))),
        }
    }
}
