//! Notification payloads handed to every transport.

use crate::domain::entities::SearchResultItem;
use serde::{Deserialize, Serialize};
use url::Url;

const MAX_KEYWORDS: usize = 10;
const MIN_KEYWORD_LENGTH: usize = 4;

/// One URL listed in a notification, with optional search metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEntry {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl NotificationEntry {
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            snippet: None,
            date: None,
        }
    }
}

impl From<&SearchResultItem> for NotificationEntry {
    fn from(item: &SearchResultItem) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            url: item.url.clone(),
            title: non_empty(&item.title),
            snippet: non_empty(&item.snippet),
            date: item.date.clone(),
        }
    }
}

/// Where a content update was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOrigin {
    Sitemap,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Info,
    Warning,
    Error,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Info => "info",
            AlertLevel::Warning => "warning",
            AlertLevel::Error => "error",
        }
    }
}

/// Event delivered to the notification transports.
///
/// Each transport renders the variant into its own wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationPayload {
    /// New URLs for one site or monitored domain.
    TextUpdate {
        origin: UpdateOrigin,
        source: String,
        entries: Vec<NotificationEntry>,
    },
    /// Summary of everything a scheduled run found.
    Digest {
        entries: Vec<NotificationEntry>,
        keywords: Vec<String>,
        domains: Vec<String>,
    },
    StatusAlert { level: AlertLevel, message: String },
}

impl NotificationPayload {
    pub fn sitemap_update(domain: &str, urls: &[String]) -> Self {
        NotificationPayload::TextUpdate {
            origin: UpdateOrigin::Sitemap,
            source: domain.to_string(),
            entries: urls.iter().map(NotificationEntry::url).collect(),
        }
    }

    pub fn search_update(domain: &str, items: &[SearchResultItem]) -> Self {
        NotificationPayload::TextUpdate {
            origin: UpdateOrigin::Search,
            source: domain.to_string(),
            entries: items.iter().map(NotificationEntry::from).collect(),
        }
    }

    /// Builds a digest, deriving keywords and the distinct hosts from `urls`.
    pub fn digest(urls: &[String]) -> Self {
        NotificationPayload::Digest {
            entries: urls.iter().map(NotificationEntry::url).collect(),
            keywords: extract_keywords(urls),
            domains: distinct_hosts(urls),
        }
    }

    pub fn status(level: AlertLevel, message: impl Into<String>) -> Self {
        NotificationPayload::StatusAlert {
            level,
            message: message.into(),
        }
    }

    /// Stable event name, also used as the `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationPayload::TextUpdate { .. } => "text_update",
            NotificationPayload::Digest { .. } => "digest",
            NotificationPayload::StatusAlert { .. } => "status_alert",
        }
    }

    /// Human-readable headline shared by all renderers.
    pub fn title(&self) -> String {
        match self {
            NotificationPayload::TextUpdate {
                origin: UpdateOrigin::Sitemap,
                source,
                entries,
            } => format!("{}: {} new page(s) in sitemap", source, entries.len()),
            NotificationPayload::TextUpdate {
                origin: UpdateOrigin::Search,
                source,
                entries,
            } => format!("{}: {} new search result(s)", source, entries.len()),
            NotificationPayload::Digest {
                entries, domains, ..
            } => format!(
                "Digest: {} new URL(s) across {} site(s)",
                entries.len(),
                domains.len()
            ),
            NotificationPayload::StatusAlert { level, .. } => {
                format!("Status [{}]", level.as_str())
            }
        }
    }

    pub fn entries(&self) -> &[NotificationEntry] {
        match self {
            NotificationPayload::TextUpdate { entries, .. }
            | NotificationPayload::Digest { entries, .. } => entries,
            NotificationPayload::StatusAlert { .. } => &[],
        }
    }
}

/// Distinct URL path segments that look like words.
///
/// A segment qualifies when it is longer than three characters and contains
/// no `-`. At most ten are returned, in first-seen order.
pub fn extract_keywords(urls: &[String]) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();

    for url in urls {
        let Ok(parsed) = Url::parse(url) else {
            continue;
        };
        let Some(segments) = parsed.path_segments() else {
            continue;
        };

        for segment in segments {
            if segment.len() >= MIN_KEYWORD_LENGTH
                && !segment.contains('-')
                && !keywords.iter().any(|k| k == segment)
            {
                keywords.push(segment.to_string());
                if keywords.len() == MAX_KEYWORDS {
                    return keywords;
                }
            }
        }
    }

    keywords
}

fn distinct_hosts(urls: &[String]) -> Vec<String> {
    let mut hosts: Vec<String> = Vec::new();
    for host in urls
        .iter()
        .filter_map(|u| Url::parse(u).ok())
        .filter_map(|u| u.host_str().map(str::to_string))
    {
        if !hosts.contains(&host) {
            hosts.push(host);
        }
    }
    hosts
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keywords_filtering() {
        let urls = vec![
            "https://a.com/blog/rust-async/guide".to_string(),
            "https://a.com/blog/tooling".to_string(),
            "https://b.com/api/v1/release".to_string(),
        ];
        assert_eq!(
            extract_keywords(&urls),
            vec!["blog", "guide", "tooling", "release"]
        );
    }

    #[test]
    fn test_keywords_capped() {
        let urls: Vec<String> = (0..30)
            .map(|i| format!("https://a.com/keyword{}", i))
            .collect();
        assert_eq!(extract_keywords(&urls).len(), 10);
    }

    #[test]
    fn test_digest_domains() {
        let payload = NotificationPayload::digest(&[
            "https://a.com/x".to_string(),
            "https://b.com/y".to_string(),
            "https://a.com/z".to_string(),
        ]);
        match payload {
            NotificationPayload::Digest { domains, entries, .. } => {
                assert_eq!(domains, vec!["a.com", "b.com"]);
                assert_eq!(entries.len(), 3);
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_serialized_tag() {
        let payload = NotificationPayload::status(AlertLevel::Warning, "disk");
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "type": "status_alert", "level": "warning", "message": "disk" })
        );
        assert_eq!(payload.kind(), "status_alert");
    }

    #[test]
    fn test_search_entry_drops_empty_metadata() {
        let item = SearchResultItem::new("https://a.com/1", "");
        let entry = NotificationEntry::from(&item);
        assert!(entry.title.is_none());
        assert!(entry.snippet.is_none());
    }
}
