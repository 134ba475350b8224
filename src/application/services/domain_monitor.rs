//! The monitored-domain set.

use std::sync::Arc;

use super::shared_list::{self, Inserted, Removed};
use crate::domain::entities::{DomainAddOutcome, DomainRemoveOutcome, MonitoredDomain};
use crate::domain::repositories::{ListRepository, SearchResultRepository};
use crate::error::AppError;
use crate::utils::domain_name::normalize_domain;
use crate::utils::retry::RetryPolicy;
use tracing::info;

/// Adds and removes monitored domains under optimistic concurrency.
///
/// Adds get 5 attempts with 50-150ms jittered pauses. Removals get 10
/// attempts with exponential backoff, since a removal that does not converge
/// leaves a domain that keeps being searched.
pub struct DomainMonitor<L, R>
where
    L: ListRepository,
    R: SearchResultRepository,
{
    domains: Arc<L>,
    results: Arc<R>,
    add_policy: RetryPolicy,
    remove_policy: RetryPolicy,
}

impl<L, R> DomainMonitor<L, R>
where
    L: ListRepository,
    R: SearchResultRepository,
{
    pub fn new(domains: Arc<L>, results: Arc<R>) -> Self {
        Self {
            domains,
            results,
            add_policy: RetryPolicy::for_list_insert(),
            remove_policy: RetryPolicy::for_list_removal(),
        }
    }

    pub fn with_policies(mut self, add: RetryPolicy, remove: RetryPolicy) -> Self {
        self.add_policy = add;
        self.remove_policy = remove;
        self
    }

    /// Adds `domain` to the set.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for malformed input, without touching the store
    /// - [`AppError::Conflict`] if the write did not converge
    pub async fn add(&self, domain: &str) -> Result<DomainAddOutcome, AppError> {
        let domain = normalize_domain(domain)?;

        let outcome = shared_list::insert(
            self.domains.as_ref(),
            &domain,
            &self.add_policy,
            "domain_add",
        )
        .await?;

        Ok(match outcome {
            Inserted::Added => {
                info!(domain, "Domain added to monitoring");
                DomainAddOutcome::Added
            }
            Inserted::AlreadyPresent => DomainAddOutcome::AlreadyMonitored,
        })
    }

    /// Removes `domain` and deletes its stored search results and last-check
    /// marker. Removing an absent domain succeeds and still deletes leftovers
    /// of an earlier removal whose cleanup failed.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for malformed input
    /// - [`AppError::Conflict`] if removal did not converge
    pub async fn remove(&self, domain: &str) -> Result<DomainRemoveOutcome, AppError> {
        let domain = normalize_domain(domain)?;
        let results = self.results.as_ref();

        let outcome = shared_list::remove(
            self.domains.as_ref(),
            &domain,
            &self.remove_policy,
            "domain_remove",
            || results.clear(&domain),
        )
        .await?;

        Ok(match outcome {
            Removed::Removed => {
                info!(domain, "Domain removed from monitoring");
                DomainRemoveOutcome::Removed
            }
            Removed::NotPresent => DomainRemoveOutcome::NotMonitored,
        })
    }

    /// Monitored domains in insertion order.
    pub async fn list(&self) -> Result<Vec<String>, AppError> {
        self.domains.load().await
    }

    /// Monitored domains with their last search check.
    pub async fn list_with_last_check(&self) -> Result<Vec<MonitoredDomain>, AppError> {
        let mut monitored = Vec::new();
        for domain in self.domains.load().await? {
            let last_check = self.results.last_check(&domain).await?;
            monitored.push(MonitoredDomain { domain, last_check });
        }
        Ok(monitored)
    }
}
