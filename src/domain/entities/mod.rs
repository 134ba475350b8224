//! Core domain entities.
//!
//! # Entity Types
//!
//! - [`Feed`] - A registered root sitemap URL
//! - [`Snapshot`] / [`SnapshotKind`] - Stored URL sets per site
//! - [`ChangeOutcome`] - Result of diffing a resolution against the current snapshot
//! - [`SearchResultItem`] - An organic search hit for a monitored domain
//! - [`NotificationPayload`] - Event handed to the transports
//! - [`DispatchResult`] - Per-channel outcome of one dispatch
//! - [`RunReport`] / [`MonitorStatus`] - Run summaries and service status

pub mod dispatch;
pub mod feed;
pub mod monitored_domain;
pub mod notification;
pub mod run;
pub mod search_result;
pub mod snapshot;

pub use dispatch::{ChannelOutcome, DispatchResult};
pub use feed::{Feed, FeedRefresh};
pub use monitored_domain::{DomainAddOutcome, DomainRemoveOutcome, MonitoredDomain};
pub use notification::{
    AlertLevel, NotificationEntry, NotificationPayload, UpdateOrigin, extract_keywords,
};
pub use run::{FeedStatus, MonitorStatus, RunItem, RunKind, RunReport};
pub use search_result::{SearchResultItem, new_items};
pub use snapshot::{ChangeOutcome, Snapshot, SnapshotKind, diff_urls};
