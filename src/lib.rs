//! # Site Bot
//!
//! Watches websites for new content and announces it on chat, email and
//! webhook channels.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Entities, repository traits and the storage key layout
//! - **Application Layer** ([`application`]) - Sitemap resolution, diffing, the
//!   optimistic-concurrency list protocol, search diffing and dispatch
//! - **Infrastructure Layer** ([`infrastructure`]) - Key-value stores, HTTP clients and transports
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Recursive sitemap index resolution with a depth limit
//! - Snapshot rotation (current, latest, one per day) and URL diffing
//! - Search-index monitoring of domains through the Serper API
//! - Concurrent fan-out to Feishu, Telegram, email and a status webhook
//! - Lock-free shared lists on a store without compare-and-swap
//!
//! ## Quick Start
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379"  # Optional
//! export FEISHU_WEBHOOK="https://open.feishu.cn/open-apis/bot/v2/hook/..."
//!
//! cargo run
//! curl -X POST localhost:3000/api/feeds/add -d '{"url":"https://example.com/sitemap.xml"}' \
//!     -H 'content-type: application/json'
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{Dispatcher, Monitor};
    pub use crate::domain::entities::{
        DispatchResult, FeedRefresh, NotificationPayload, RunReport, SnapshotKind,
    };
    pub use crate::error::AppError;
    pub use crate::infrastructure::kv::{KvStore, MemoryKvStore};
    pub use crate::state::{AppMonitor, AppState};
}
