//! Handlers for feed registry endpoints.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::feeds::{FeedAddResponse, FeedListResponse, FeedRemoveResponse, FeedRequest};
use crate::error::AppError;
use crate::state::AppState;

/// Registers a root sitemap, or refreshes it if already registered.
///
/// # Endpoint
///
/// `POST /api/feeds/add`
///
/// The sitemap is resolved and diffed before anything is stored; the response
/// carries the resolution result, including the URLs that were new.
///
/// # Errors
///
/// Returns 400 if the URL is invalid.
/// Returns 502 if the root sitemap cannot be fetched (the feed is not registered).
/// Returns 409 if the registry write did not converge.
pub async fn add_feed_handler(
    State(state): State<AppState>,
    Json(payload): Json<FeedRequest>,
) -> Result<Json<FeedAddResponse>, AppError> {
    payload.validate()?;

    let result = state.monitor.feeds().add(&payload.url).await?;

    Ok(Json(FeedAddResponse {
        status: "success",
        result,
    }))
}

/// Unregisters a root sitemap. Stored snapshots are kept.
///
/// # Endpoint
///
/// `POST /api/feeds/remove`
///
/// # Errors
///
/// Returns 404 if the feed is not registered.
pub async fn remove_feed_handler(
    State(state): State<AppState>,
    Json(payload): Json<FeedRequest>,
) -> Result<Json<FeedRemoveResponse>, AppError> {
    payload.validate()?;

    state.monitor.feeds().remove(&payload.url).await?;

    Ok(Json(FeedRemoveResponse {
        status: "success",
        url: payload.url,
    }))
}

/// `GET /api/feeds`
pub async fn feed_list_handler(
    State(state): State<AppState>,
) -> Result<Json<FeedListResponse>, AppError> {
    let items = state.monitor.feeds().list().await?;

    Ok(Json(FeedListResponse {
        total: items.len(),
        items,
    }))
}
