mod common;

use common::{FlakyKvStore, InterleavingKvStore};
use futures::future::join_all;
use site_bot::application::services::DomainMonitor;
use site_bot::domain::entities::{DomainAddOutcome, DomainRemoveOutcome};
use site_bot::domain::keys;
use site_bot::infrastructure::kv::{KvStore, MemoryKvStore};
use site_bot::infrastructure::persistence::{KvListRepository, KvSearchResultRepository};
use site_bot::utils::retry::RetryPolicy;
use std::sync::Arc;
use std::sync::atomic::Ordering;

type Domains = DomainMonitor<KvListRepository, KvSearchResultRepository>;

fn monitor(store: Arc<dyn KvStore>) -> Domains {
    DomainMonitor::new(
        Arc::new(KvListRepository::monitored_domains(store.clone())),
        Arc::new(KvSearchResultRepository::new(store)),
    )
    .with_policies(RetryPolicy::immediate(5), RetryPolicy::immediate(10))
}

#[tokio::test]
async fn test_interleaved_adds_of_same_domain_add_once() {
    let store: Arc<dyn KvStore> = Arc::new(InterleavingKvStore::default());
    // one instance per caller, all sharing the store
    let monitors: Vec<Domains> = (0..8).map(|_| monitor(store.clone())).collect();

    let outcomes = join_all(monitors.iter().map(|m| m.add("example.com"))).await;

    let added = outcomes
        .iter()
        .filter(|o| matches!(o, Ok(DomainAddOutcome::Added)))
        .count();
    let existing = outcomes
        .iter()
        .filter(|o| matches!(o, Ok(DomainAddOutcome::AlreadyMonitored)))
        .count();
    assert_eq!(added, 1);
    assert_eq!(existing, 7);
    assert_eq!(monitors[0].list().await.unwrap(), vec!["example.com"]);
}

#[tokio::test]
async fn test_sequential_adds_of_same_domain_add_once() {
    let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
    let monitor = monitor(store);

    let outcomes = join_all((0..8).map(|_| monitor.add("example.com"))).await;

    assert_eq!(outcomes[0].as_ref().unwrap(), &DomainAddOutcome::Added);
    assert!(
        outcomes[1..]
            .iter()
            .all(|o| matches!(o, Ok(DomainAddOutcome::AlreadyMonitored)))
    );
    assert_eq!(monitor.list().await.unwrap(), vec!["example.com"]);
}

#[tokio::test]
async fn test_interleaved_adds_of_different_domains_both_survive() {
    let store: Arc<dyn KvStore> = Arc::new(InterleavingKvStore::default());
    // two instances sharing one store, as two service replicas would
    let first = monitor(store.clone());
    let second = monitor(store);

    let (a, b) = tokio::join!(first.add("a.com"), second.add("b.com"));

    assert_eq!(a.unwrap(), DomainAddOutcome::Added);
    assert_eq!(b.unwrap(), DomainAddOutcome::Added);

    let mut domains = first.list().await.unwrap();
    domains.sort();
    assert_eq!(domains, vec!["a.com", "b.com"]);
}

#[tokio::test]
async fn test_interleaved_removes_converge() {
    let store: Arc<dyn KvStore> = Arc::new(InterleavingKvStore::default());
    let first = monitor(store.clone());
    let second = monitor(store.clone());

    first.add("a.com").await.unwrap();
    first.add("b.com").await.unwrap();
    store.put(&keys::search_results("a.com"), "[]").await.unwrap();
    store
        .put(&keys::search_last_check("a.com"), "2025-01-01T00:00:00+00:00")
        .await
        .unwrap();

    let (x, y) = tokio::join!(first.remove("a.com"), second.remove("a.com"));

    for outcome in [x.unwrap(), y.unwrap()] {
        assert!(matches!(
            outcome,
            DomainRemoveOutcome::Removed | DomainRemoveOutcome::NotMonitored
        ));
    }
    assert_eq!(first.list().await.unwrap(), vec!["b.com"]);
    assert!(store.get(&keys::search_results("a.com")).await.unwrap().is_none());
    assert!(store.get(&keys::search_last_check("a.com")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_remove_converges_when_cleanup_fails_partway() {
    let store = Arc::new(FlakyKvStore::new(0).failing_deletes(1));
    let monitor = monitor(store.clone());

    monitor.add("a.com").await.unwrap();
    monitor.add("b.com").await.unwrap();
    store.put(&keys::search_results("a.com"), "[]").await.unwrap();
    store
        .put(&keys::search_last_check("a.com"), "2025-01-01T00:00:00+00:00")
        .await
        .unwrap();

    // the list write lands, then the first delete of the cleanup fails
    let outcome = monitor.remove("a.com").await.unwrap();

    assert_eq!(outcome, DomainRemoveOutcome::Removed);
    assert_eq!(monitor.list().await.unwrap(), vec!["b.com"]);
    assert!(store.get(&keys::search_results("a.com")).await.unwrap().is_none());
    assert!(store.get(&keys::search_last_check("a.com")).await.unwrap().is_none());
    assert!(
        store
            .get(&keys::list_claim(keys::MONITORED_DOMAINS_LIST, "a.com"))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_remove_of_unmonitored_domain_clears_leftovers() {
    let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
    let monitor = monitor(store.clone());
    store.put(&keys::search_results("a.com"), "[]").await.unwrap();

    let outcome = monitor.remove("a.com").await.unwrap();

    assert_eq!(outcome, DomainRemoveOutcome::NotMonitored);
    assert!(store.get(&keys::search_results("a.com")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_add_recovers_from_transient_write_failures() {
    let store = Arc::new(FlakyKvStore::new(2));
    let monitor = monitor(store.clone());

    let outcome = monitor.add("example.com").await.unwrap();

    assert_eq!(outcome, DomainAddOutcome::Added);
    // two rejected claim writes, then the claim and the list
    assert_eq!(store.puts.load(Ordering::SeqCst), 4);
    assert_eq!(monitor.list().await.unwrap(), vec!["example.com"]);
}

#[tokio::test]
async fn test_add_gives_up_after_five_attempts() {
    let store = Arc::new(FlakyKvStore::new(usize::MAX));
    let monitor = monitor(store.clone());

    let err = monitor.add("example.com").await.unwrap_err();

    assert_eq!(err.code(), "store_conflict_exhausted");
    let info = err.to_error_info();
    assert_eq!(info.details["attempts"], 5);
    assert_eq!(store.puts.load(Ordering::SeqCst), 5);
    assert!(monitor.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_domain_never_touches_store() {
    let store = Arc::new(FlakyKvStore::new(0));
    let monitor = monitor(store.clone());

    let err = monitor.add("https://example.com/").await.unwrap_err();

    assert_eq!(err.code(), "validation_error");
    assert_eq!(store.puts.load(Ordering::SeqCst), 0);
}
