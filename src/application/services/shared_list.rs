//! Optimistic read-modify-write on shared list documents.
//!
//! The store offers only get/put/delete, so two callers may read the same
//! list and overwrite each other's write. Each mutation therefore re-reads after
//! writing and treats a missing effect as a failed attempt, which the retry
//! policy repeats from a fresh read.
//!
//! Callers inserting the same item concurrently can all see it in the list
//! after their write. Each one writes a random claim token for the item before
//! the list write and reads it back afterwards; only the caller whose token
//! survived reports [`Inserted::Added`].

use crate::domain::repositories::ListRepository;
use crate::error::AppError;
use crate::utils::retry::{RetryPolicy, retry};
use serde_json::json;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Outcome of [`insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inserted {
    Added,
    AlreadyPresent,
}

/// Outcome of [`remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removed {
    Removed,
    NotPresent,
}

/// Appends `item` unless it is already in the list.
///
/// Finding the item present ends the operation without a write. After a
/// write the list is read back and the item must be in it. A caller whose
/// claim token was overwritten by a concurrent inserter reports
/// [`Inserted::AlreadyPresent`].
///
/// # Errors
///
/// Returns [`AppError::Conflict`] with the attempt count and last failure once
/// the policy's attempts are used up.
pub async fn insert<L>(
    list: &L,
    item: &str,
    policy: &RetryPolicy,
    label: &'static str,
) -> Result<Inserted, AppError>
where
    L: ListRepository + ?Sized,
{
    retry(policy, label, |attempt| async move {
        let mut items = list.load().await?;
        if items.iter().any(|i| i == item) {
            return Ok(Inserted::AlreadyPresent);
        }

        let token = claim_token();
        list.set_claim(item, &token).await?;

        items.push(item.to_string());
        list.save(&items).await?;

        let written = list.load().await?;
        if !written.iter().any(|i| i == item) {
            return Err(AppError::conflict(
                "Item missing after write",
                json!({ "item": item, "attempt": attempt }),
            ));
        }

        if list.claim(item).await?.as_deref() != Some(token.as_str()) {
            debug!(item, attempt, "Concurrent insert won the claim");
            return Ok(Inserted::AlreadyPresent);
        }

        debug!(item, attempt, "Inserted into shared list");
        Ok(Inserted::Added)
    })
    .await
    .map_err(|e| AppError::store_conflict_exhausted(e.attempts, e.last_error))
}

/// Removes every occurrence of `item`, then runs `cleanup`.
///
/// An absent item is a success: a concurrent caller, or an earlier attempt of
/// this call, may already have removed it. The item's claim token and
/// `cleanup` still run on that path, so both must be idempotent. After the
/// write the list is read back and must no longer contain the item. Any
/// failing step, `cleanup` included, restarts from a fresh read.
///
/// Reports [`Removed::Removed`] if this call wrote the list, even when a
/// later attempt finished the cleanup.
///
/// # Errors
///
/// Returns [`AppError::Conflict`] once the policy's attempts are used up.
pub async fn remove<L, C, Fut>(
    list: &L,
    item: &str,
    policy: &RetryPolicy,
    label: &'static str,
    cleanup: C,
) -> Result<Removed, AppError>
where
    L: ListRepository + ?Sized,
    C: Fn() -> Fut,
    Fut: Future<Output = Result<(), AppError>>,
{
    let cleanup = &cleanup;
    let wrote = AtomicBool::new(false);
    let wrote = &wrote;

    retry(policy, label, |attempt| async move {
        let items = list.load().await?;
        if items.iter().any(|i| i == item) {
            let remaining: Vec<String> = items.iter().filter(|i| *i != item).cloned().collect();
            if remaining.len() >= items.len() {
                return Err(AppError::internal(
                    "Removal did not shrink the list",
                    json!({ "item": item, "before": items.len(), "after": remaining.len() }),
                ));
            }

            list.save(&remaining).await?;

            let written = list.load().await?;
            if written.iter().any(|i| i == item) {
                return Err(AppError::conflict(
                    "Item still present after write",
                    json!({ "item": item, "attempt": attempt }),
                ));
            }
            wrote.store(true, Ordering::SeqCst);
        }

        list.clear_claim(item).await?;
        cleanup().await?;

        if wrote.load(Ordering::SeqCst) {
            debug!(item, attempt, "Removed from shared list");
            Ok(Removed::Removed)
        } else {
            Ok(Removed::NotPresent)
        }
    })
    .await
    .map_err(|e| AppError::store_conflict_exhausted(e.attempts, e.last_error))
}

fn claim_token() -> String {
    format!("{:016x}", rand::random::<u64>())
}
