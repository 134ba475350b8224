//! DTOs for monitored-domain endpoints.

use crate::domain::entities::{DomainAddOutcome, DomainRemoveOutcome, MonitoredDomain};
use crate::error::{AppError, ErrorInfo};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

/// Body of `POST /api/domains/add` and `POST /api/domains/remove`.
///
/// Accepts a single domain or a batch:
///
/// ```json
/// { "domain": "example.com" }
/// { "domains": ["example.com", "example.org"] }
/// ```
///
/// When both are present, `domain` wins. Batches hold at most 100 domains.
#[derive(Debug, Deserialize, Validate)]
pub struct DomainBatchRequest {
    #[validate(length(min = 1, max = 253))]
    pub domain: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub domains: Option<Vec<String>>,
}

impl DomainBatchRequest {
    /// The domains to process, in request order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if neither field is present.
    pub fn into_domains(self) -> Result<Vec<String>, AppError> {
        match (self.domain, self.domains) {
            (Some(domain), _) => Ok(vec![domain]),
            (None, Some(domains)) => Ok(domains),
            (None, None) => Err(AppError::bad_request(
                "Missing domain or domains",
                json!({ "fields": ["domain", "domains"] }),
            )),
        }
    }
}

/// Overall outcome of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Success,
    Partial,
    Error,
}

impl BatchStatus {
    pub fn from_counts(successful: usize, failed: usize) -> Self {
        match (successful, failed) {
            (_, 0) => BatchStatus::Success,
            (0, _) => BatchStatus::Error,
            _ => BatchStatus::Partial,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum DomainOutcome {
    Add(DomainAddOutcome),
    Remove(DomainRemoveOutcome),
}

/// Result for one domain of a batch.
#[derive(Debug, Serialize)]
pub struct DomainResultItem {
    pub domain: String,
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<DomainOutcome>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl DomainResultItem {
    pub fn from_result(domain: String, result: Result<DomainOutcome, AppError>) -> Self {
        match result {
            Ok(outcome) => Self {
                domain,
                success: true,
                outcome: Some(outcome),
                error: None,
            },
            Err(e) => Self {
                domain,
                success: false,
                outcome: None,
                error: Some(e.to_error_info()),
            },
        }
    }
}

/// Summary statistics for batch processing.
#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

#[derive(Debug, Serialize)]
pub struct DomainBatchResponse {
    pub status: BatchStatus,
    pub results: Vec<DomainResultItem>,
    pub summary: BatchSummary,
}

impl DomainBatchResponse {
    pub fn from_results(results: Vec<DomainResultItem>) -> Self {
        let successful = results.iter().filter(|r| r.success).count();
        let failed = results.len() - successful;

        Self {
            status: BatchStatus::from_counts(successful, failed),
            summary: BatchSummary {
                total: results.len(),
                successful,
                failed,
            },
            results,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DomainListResponse {
    pub total: usize,
    pub items: Vec<MonitoredDomain>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_status() {
        assert_eq!(BatchStatus::from_counts(3, 0), BatchStatus::Success);
        assert_eq!(BatchStatus::from_counts(2, 1), BatchStatus::Partial);
        assert_eq!(BatchStatus::from_counts(0, 2), BatchStatus::Error);
    }

    #[test]
    fn test_into_domains_prefers_single() {
        let request = DomainBatchRequest {
            domain: Some("a.com".to_string()),
            domains: Some(vec!["b.com".to_string()]),
        };
        assert_eq!(request.into_domains().unwrap(), vec!["a.com"]);
    }

    #[test]
    fn test_into_domains_requires_a_field() {
        let request = DomainBatchRequest {
            domain: None,
            domains: None,
        };
        assert_eq!(
            request.into_domains().unwrap_err().code(),
            "validation_error"
        );
    }

    #[test]
    fn test_result_item_serialization() {
        let ok = DomainResultItem::from_result(
            "a.com".to_string(),
            Ok(DomainOutcome::Add(DomainAddOutcome::AlreadyMonitored)),
        );
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["outcome"], "already_monitored");
        assert!(json.get("error").is_none());

        let failed = DomainResultItem::from_result(
            "bad".to_string(),
            Err(AppError::bad_request("Invalid domain", json!({}))),
        );
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "validation_error");
    }
}
