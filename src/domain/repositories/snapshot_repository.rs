//! Repository trait for per-site snapshots.

use crate::domain::entities::SnapshotKind;
use crate::error::AppError;
use async_trait::async_trait;

/// Storage for canonical snapshot documents and the last-update marker.
///
/// Documents are stored exactly as produced by
/// [`crate::utils::sitemap_xml::to_canonical_xml`] so that two snapshots can be
/// compared byte for byte.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::KvSnapshotRepository`] - Key-value implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Reads the stored document of the given kind.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(xml))` if a snapshot exists
    /// - `Ok(None)` if not
    async fn get(&self, domain: &str, kind: SnapshotKind) -> Result<Option<String>, AppError>;

    /// Writes a document, replacing any previous one of the same kind.
    async fn put(&self, domain: &str, kind: SnapshotKind, document: &str)
    -> Result<(), AppError>;

    async fn set_last_update(&self, domain: &str, timestamp: &str) -> Result<(), AppError>;

    async fn last_update(&self, domain: &str) -> Result<Option<String>, AppError>;
}
