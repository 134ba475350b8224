//! Handler for snapshot reads.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::dto::snapshots::SnapshotQuery;
use crate::domain::entities::Snapshot;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the URLs of a stored snapshot.
///
/// # Endpoint
///
/// `GET /api/snapshots/{domain}?kind=current|latest|dated&date=YYYYMMDD`
///
/// # Errors
///
/// Returns 400 for an unknown kind or malformed date.
/// Returns 404 if no such snapshot was stored.
pub async fn snapshot_handler(
    Path(domain): Path<String>,
    Query(query): Query<SnapshotQuery>,
    State(state): State<AppState>,
) -> Result<Json<Snapshot>, AppError> {
    let kind = query.to_kind()?;
    let domain = domain.trim().to_lowercase();

    let snapshot = state.monitor.snapshot(&domain, kind).await?;

    Ok(Json(snapshot))
}
