//! JSON documents on top of the key-value store.

use crate::error::AppError;
use crate::infrastructure::kv::KvStore;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Reads and decodes a JSON document. `Ok(None)` if the key is absent.
///
/// # Errors
///
/// A document that does not decode is an error rather than an empty value,
/// so a damaged list is never silently overwritten.
pub(crate) async fn load<T: DeserializeOwned>(
    store: &dyn KvStore,
    key: &str,
) -> Result<Option<T>, AppError> {
    match store.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub(crate) async fn save<T: Serialize + ?Sized>(
    store: &dyn KvStore,
    key: &str,
    value: &T,
) -> Result<(), AppError> {
    let raw = serde_json::to_string(value)?;
    store.put(key, &raw).await?;
    Ok(())
}
