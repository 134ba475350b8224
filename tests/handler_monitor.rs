mod common;

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;
use site_bot::domain::entities::{AlertLevel, NotificationPayload, UpdateOrigin};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves `first` once, then `then` for every later request.
async fn changing_sitemap(first: &[&str], then: &[&str]) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(common::urlset(first)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(common::urlset(then)))
        .mount(&server)
        .await;
    server
}

async fn wait_for_payloads(app: &common::TestApp, count: usize) -> Vec<NotificationPayload> {
    for _ in 0..100 {
        let payloads = app.transport.payloads();
        if payloads.len() >= count {
            return payloads;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    app.transport.payloads()
}

// ─── STATUS ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_status_lists_feeds_domains_and_channels() {
    let site = changing_sitemap(&["https://a.com/p1"], &["https://a.com/p1"]).await;
    let app = common::create_test_app(None);
    let server = common::create_test_server(&app);
    let feed_url = format!("{}/sitemap.xml", site.uri());

    server
        .post("/api/feeds/add")
        .json(&json!({ "url": feed_url }))
        .await
        .assert_status_ok();
    server
        .post("/api/domains/add")
        .json(&json!({ "domain": "example.com" }))
        .await
        .assert_status_ok();

    let response = server.get("/api/status").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "running");
    assert_eq!(json["feeds"][0]["url"], feed_url);
    assert_eq!(json["feeds"][0]["domain"], "127.0.0.1");
    assert!(json["feeds"][0]["last_update"].is_string());
    assert_eq!(json["domains"][0]["domain"], "example.com");
    assert_eq!(json["channels"], json!(["recorder"]));
    assert_eq!(json["search_configured"], false);
}

// ─── NOTIFICATIONS ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_notification_test_reaches_every_channel() {
    let app = common::create_test_app(None);
    let server = common::create_test_server(&app);

    let response = server.post("/api/notifications/test").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "success");
    assert_eq!(json["result"]["total"], 1);
    assert_eq!(json["result"]["success"], 1);
    assert_eq!(json["result"]["channels"]["recorder"]["success"], true);

    let payloads = app.transport.payloads();
    assert_eq!(payloads.len(), 1);
    assert!(matches!(
        &payloads[0],
        NotificationPayload::StatusAlert {
            level: AlertLevel::Info,
            message,
        } if message.starts_with("Test message from site-bot")
    ));
}

// ─── SNAPSHOTS ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_snapshot_not_found_before_first_resolution() {
    let app = common::create_test_app(None);
    let server = common::create_test_server(&app);

    let response = server.get("/api/snapshots/a.com").await;

    response.assert_status_not_found();
    assert_eq!(response.json::<serde_json::Value>()["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_snapshot_rotation_visible_through_api() {
    let site = changing_sitemap(
        &["https://a.com/p1", "https://a.com/p2"],
        &["https://a.com/p1", "https://a.com/p2", "https://a.com/p3"],
    )
    .await;
    let app = common::create_test_app(None);
    let server = common::create_test_server(&app);
    let body = json!({ "url": format!("{}/sitemap.xml", site.uri()) });

    server.post("/api/feeds/add").json(&body).await.assert_status_ok();
    server
        .get("/api/snapshots/127.0.0.1")
        .add_query_param("kind", "latest")
        .await
        .assert_status_not_found();

    let refresh = server.post("/api/feeds/add").json(&body).await;
    refresh.assert_status_ok();
    assert_eq!(
        refresh.json::<serde_json::Value>()["result"]["new_urls"],
        json!(["https://a.com/p3"])
    );

    let current = server.get("/api/snapshots/127.0.0.1").await;
    current.assert_status_ok();
    let current = current.json::<serde_json::Value>();
    assert_eq!(current["kind"], "current");
    assert_eq!(
        current["urls"],
        json!(["https://a.com/p1", "https://a.com/p2", "https://a.com/p3"])
    );

    let latest = server
        .get("/api/snapshots/127.0.0.1")
        .add_query_param("kind", "latest")
        .await;
    latest.assert_status_ok();
    assert_eq!(
        latest.json::<serde_json::Value>()["urls"],
        json!(["https://a.com/p1", "https://a.com/p2"])
    );

    let today = Utc::now().format("%Y%m%d").to_string();
    let dated = server
        .get("/api/snapshots/127.0.0.1")
        .add_query_param("kind", "dated")
        .add_query_param("date", &today)
        .await;
    dated.assert_status_ok();
    assert_eq!(
        dated.json::<serde_json::Value>()["kind"],
        format!("dated:{}", today)
    );
}

#[tokio::test]
async fn test_snapshot_bad_query() {
    let app = common::create_test_app(None);
    let server = common::create_test_server(&app);

    server
        .get("/api/snapshots/a.com")
        .add_query_param("kind", "yesterday")
        .await
        .assert_status_bad_request();
    server
        .get("/api/snapshots/a.com")
        .add_query_param("kind", "dated")
        .add_query_param("date", "2025-01-01")
        .await
        .assert_status_bad_request();
}

// ─── RUNS ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_monitor_run_is_accepted_and_notifies() {
    let site = changing_sitemap(
        &["https://a.com/p1"],
        &["https://a.com/p1", "https://a.com/blog/launch"],
    )
    .await;
    let app = common::create_test_app(None);
    let server = common::create_test_server(&app);

    server
        .post("/api/feeds/add")
        .json(&json!({ "url": format!("{}/sitemap.xml", site.uri()) }))
        .await
        .assert_status_ok();

    let response = server.post("/api/monitor/run").await;

    response.assert_status(StatusCode::ACCEPTED);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "success");
    assert_eq!(json["run"], "sitemap");

    let payloads = wait_for_payloads(&app, 2).await;
    assert_eq!(payloads.len(), 2);
    assert!(matches!(
        &payloads[0],
        NotificationPayload::TextUpdate {
            origin: UpdateOrigin::Sitemap,
            source,
            entries,
        } if source == "127.0.0.1" && entries.len() == 1 && entries[0].url == "https://a.com/blog/launch"
    ));
    assert!(matches!(&payloads[1], NotificationPayload::Digest { .. }));
}

#[tokio::test]
async fn test_search_run_is_accepted() {
    let app = common::create_test_app(None);
    let server = common::create_test_server(&app);

    let response = server.post("/api/search/run").await;

    response.assert_status(StatusCode::ACCEPTED);
    assert_eq!(response.json::<serde_json::Value>()["run"], "search");
}
