//! Handlers for monitored-domain endpoints.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::domains::{
    DomainBatchRequest, DomainBatchResponse, DomainListResponse, DomainOutcome, DomainResultItem,
};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Clone, Copy)]
enum BatchAction {
    Add,
    Remove,
}

/// Adds one or more domains to search monitoring.
///
/// # Endpoint
///
/// `POST /api/domains/add`
///
/// # Batch Processing
///
/// Domains are processed one after another with a short pause between them.
/// A failing domain does not stop the batch; its error is reported in its
/// result item and the overall `status` becomes `partial` (or `error` when
/// nothing succeeded).
///
/// # Response
///
/// ```json
/// {
///   "status": "partial",
///   "results": [
///     { "domain": "example.com", "success": true, "outcome": "added" },
///     { "domain": "bad domain", "success": false,
///       "error": { "code": "validation_error", "message": "Invalid domain", "details": {} } }
///   ],
///   "summary": { "total": 2, "successful": 1, "failed": 1 }
/// }
/// ```
///
/// # Errors
///
/// Returns 400 if the body has neither `domain` nor `domains`, or the batch is too large.
pub async fn add_domains_handler(
    State(state): State<AppState>,
    Json(payload): Json<DomainBatchRequest>,
) -> Result<Json<DomainBatchResponse>, AppError> {
    payload.validate()?;
    let domains = payload.into_domains()?;

    Ok(Json(process_batch(&state, domains, BatchAction::Add).await))
}

/// Removes one or more domains and their stored search results.
///
/// # Endpoint
///
/// `POST /api/domains/remove`
///
/// Removing a domain that is not monitored succeeds with outcome
/// `not_monitored`. Same request and response shapes as
/// [`add_domains_handler`].
pub async fn remove_domains_handler(
    State(state): State<AppState>,
    Json(payload): Json<DomainBatchRequest>,
) -> Result<Json<DomainBatchResponse>, AppError> {
    payload.validate()?;
    let domains = payload.into_domains()?;

    Ok(Json(process_batch(&state, domains, BatchAction::Remove).await))
}

/// `GET /api/domains`
pub async fn domain_list_handler(
    State(state): State<AppState>,
) -> Result<Json<DomainListResponse>, AppError> {
    let items = state.monitor.domains().list_with_last_check().await?;

    Ok(Json(DomainListResponse {
        total: items.len(),
        items,
    }))
}

async fn process_batch(
    state: &AppState,
    domains: Vec<String>,
    action: BatchAction,
) -> DomainBatchResponse {
    let monitor = state.monitor.domains();
    let mut results = Vec::with_capacity(domains.len());

    for (index, domain) in domains.into_iter().enumerate() {
        if index > 0 && !state.batch_delay.is_zero() {
            tokio::time::sleep(state.batch_delay).await;
        }

        let result = match action {
            BatchAction::Add => monitor.add(&domain).await.map(DomainOutcome::Add),
            BatchAction::Remove => monitor.remove(&domain).await.map(DomainOutcome::Remove),
        };

        if let Err(e) = &result {
            tracing::warn!(domain, error = %e, "Batch item failed");
        }
        results.push(DomainResultItem::from_result(domain, result));
    }

    DomainBatchResponse::from_results(results)
}
