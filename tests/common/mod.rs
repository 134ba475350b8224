#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, routing::get};
use axum_test::TestServer;
use serde_json::json;
use site_bot::config::{Config, MonitorConfig};
use site_bot::domain::entities::NotificationPayload;
use site_bot::infrastructure::http::{HttpFetcher, SerperClient};
use site_bot::infrastructure::kv::{KvStore, MemoryKvStore, StoreError, StoreResult};
use site_bot::infrastructure::transports::{Transport, TransportError, TransportMessage};
use site_bot::api::handlers::health_handler;
use site_bot::api::routes::api_routes;
use site_bot::state::{AppState, build_monitor};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Configuration with every pause disabled.
pub fn test_config() -> Config {
    Config {
        http_timeout_secs: 5,
        monitor: MonitorConfig {
            max_depth: 3,
            child_fetch_delay: Duration::ZERO,
            feed_delay: Duration::ZERO,
            search_domain_delay: Duration::ZERO,
            batch_delay: Duration::ZERO,
            schedule_interval: None,
        },
        ..Config::default()
    }
}

/// Transport that records every payload it is asked to deliver.
pub struct RecordingTransport {
    name: &'static str,
    fail: bool,
    payloads: Mutex<Vec<NotificationPayload>>,
}

impl RecordingTransport {
    pub fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            fail: false,
            payloads: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            fail: true,
            payloads: Mutex::new(Vec::new()),
        })
    }

    pub fn payloads(&self) -> Vec<NotificationPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    fn name(&self) -> &'static str {
        self.name
    }

    fn render(&self, payload: &NotificationPayload) -> TransportMessage {
        self.payloads.lock().unwrap().push(payload.clone());
        TransportMessage {
            subject: payload.title(),
            body: json!({ "type": payload.kind() }),
        }
    }

    async fn send(&self, _message: &TransportMessage) -> Result<(), TransportError> {
        if self.fail {
            Err(TransportError::Rejected("channel down".to_string()))
        } else {
            Ok(())
        }
    }
}

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryKvStore>,
    pub transport: Arc<RecordingTransport>,
}

/// Builds the full service over an in-memory store.
///
/// With `search_endpoint` the search client is configured against that URL;
/// without it the client has no API key.
pub fn create_test_app(search_endpoint: Option<&str>) -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryKvStore::new());
    let transport = RecordingTransport::new("recorder");

    let search = match search_endpoint {
        Some(endpoint) => SerperClient::new(Some("test-key".to_string()), config.http_timeout())
            .unwrap()
            .with_endpoint(endpoint),
        None => SerperClient::new(None, config.http_timeout()).unwrap(),
    };

    let dyn_store: Arc<dyn KvStore> = store.clone();
    let transports: Vec<Arc<dyn Transport>> = vec![transport.clone()];
    let monitor = build_monitor(
        &config,
        dyn_store.clone(),
        HttpFetcher::new(config.http_timeout()).unwrap(),
        search,
        transports,
    );

    TestApp {
        state: AppState::new(Arc::new(monitor), dyn_store, Duration::ZERO),
        store,
        transport,
    }
}

/// Serves `/health` and `/api/*` without the outer middleware.
pub fn create_test_server(app: &TestApp) -> TestServer {
    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_routes())
        .with_state(app.state.clone());

    TestServer::new(router).unwrap()
}

/// Minimal leaf sitemap.
pub fn urlset(urls: &[&str]) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    for url in urls {
        xml.push_str(&format!("<url><loc>{}</loc></url>", url));
    }
    xml.push_str("</urlset>");
    xml
}

/// Minimal sitemap index.
pub fn sitemap_index(children: &[&str]) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    for child in children {
        xml.push_str(&format!("<sitemap><loc>{}</loc></sitemap>", child));
    }
    xml.push_str("</sitemapindex>");
    xml
}

/// Store whose `put` fails a fixed number of times before succeeding.
pub struct FlakyKvStore {
    inner: MemoryKvStore,
    failures_left: AtomicUsize,
    delete_failures_left: AtomicUsize,
    pub puts: AtomicUsize,
    pub deletes: AtomicUsize,
}

impl FlakyKvStore {
    pub fn new(failures: usize) -> Self {
        Self {
            inner: MemoryKvStore::new(),
            failures_left: AtomicUsize::new(failures),
            delete_failures_left: AtomicUsize::new(0),
            puts: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        }
    }

    /// Also rejects the first `failures` deletes.
    pub fn failing_deletes(self, failures: usize) -> Self {
        self.delete_failures_left.store(failures, Ordering::SeqCst);
        self
    }
}

fn take_failure(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

#[async_trait]
impl KvStore for FlakyKvStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if take_failure(&self.failures_left) {
            return Err(StoreError::Operation("write rejected".to_string()));
        }
        self.inner.put(key, value).await
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if take_failure(&self.delete_failures_left) {
            return Err(StoreError::Operation("delete rejected".to_string()));
        }
        self.inner.delete(key).await
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Store that yields to the scheduler before every operation, so concurrent
/// callers interleave their reads and writes.
#[derive(Default)]
pub struct InterleavingKvStore {
    inner: MemoryKvStore,
}

#[async_trait]
impl KvStore for InterleavingKvStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        tokio::task::yield_now().await;
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        tokio::task::yield_now().await;
        self.inner.put(key, value).await
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        tokio::task::yield_now().await;
        self.inner.delete(key).await
    }

    async fn health_check(&self) -> bool {
        true
    }
}
