//! Search result entity.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One organic result returned by the search API for a monitored domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

impl SearchResultItem {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            snippet: String::new(),
            date: None,
            position: None,
        }
    }
}

/// Items of `current` whose URL is not in `previous`.
///
/// Items whose URL is already known count as seen even if their title,
/// snippet or position changed.
pub fn new_items(previous: &[SearchResultItem], current: &[SearchResultItem]) -> Vec<SearchResultItem> {
    let known: HashSet<&str> = previous.iter().map(|item| item.url.as_str()).collect();
    current
        .iter()
        .filter(|item| !known.contains(item.url.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_change_is_not_new() {
        let previous = vec![SearchResultItem::new("https://a.com/1", "Old title")];
        let mut changed = SearchResultItem::new("https://a.com/1", "New title");
        changed.position = Some(4);
        let current = vec![changed, SearchResultItem::new("https://a.com/2", "Fresh")];

        let fresh = new_items(&previous, &current);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].url, "https://a.com/2");
    }

    #[test]
    fn test_deserialize_with_missing_fields() {
        let item: SearchResultItem = serde_json::from_str(r#"{"url":"https://a.com"}"#).unwrap();
        assert_eq!(item.title, "");
        assert!(item.date.is_none());
    }
}
