//! DTOs for feed registry endpoints.

use crate::domain::entities::FeedRefresh;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /api/feeds/add` and `POST /api/feeds/remove`.
#[derive(Debug, Deserialize, Validate)]
pub struct FeedRequest {
    /// Root sitemap URL (must be valid HTTP/HTTPS).
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct FeedAddResponse {
    pub status: &'static str,
    pub result: FeedRefresh,
}

#[derive(Debug, Serialize)]
pub struct FeedRemoveResponse {
    pub status: &'static str,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct FeedListResponse {
    pub total: usize,
    pub items: Vec<String>,
}
