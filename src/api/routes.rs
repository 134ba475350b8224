//! API route configuration.
//!
//! There is no inbound authentication; deploy behind a trusted network or proxy.

use crate::api::handlers::{
    add_domains_handler, add_feed_handler, domain_list_handler, feed_list_handler,
    remove_domains_handler, remove_feed_handler, run_monitor_handler, run_search_handler,
    snapshot_handler, status_handler, test_notification_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All API routes.
///
/// # Endpoints
///
/// - `GET  /status`               - Feeds, monitored domains and channels
/// - `GET  /feeds`                - Registered root sitemaps
/// - `POST /feeds/add`            - Register (or refresh) a sitemap
/// - `POST /feeds/remove`         - Unregister a sitemap
/// - `GET  /domains`              - Monitored domains with last check
/// - `POST /domains/add`          - Add one or more domains
/// - `POST /domains/remove`       - Remove one or more domains
/// - `POST /monitor/run`          - Start a sitemap run
/// - `POST /search/run`           - Start a search-monitor run
/// - `POST /notifications/test`   - Send a test message to every channel
/// - `GET  /snapshots/{domain}`   - Read a stored snapshot
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(status_handler))
        .route("/feeds", get(feed_list_handler))
        .route("/feeds/add", post(add_feed_handler))
        .route("/feeds/remove", post(remove_feed_handler))
        .route("/domains", get(domain_list_handler))
        .route("/domains/add", post(add_domains_handler))
        .route("/domains/remove", post(remove_domains_handler))
        .route("/monitor/run", post(run_monitor_handler))
        .route("/search/run", post(run_search_handler))
        .route("/notifications/test", post(test_notification_handler))
        .route("/snapshots/{domain}", get(snapshot_handler))
}
