use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::PersistError;

/// A cached preview, stored under the link's URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewEntry {
    pub preview_markup: String,
    /// Epoch milliseconds.
    pub expires_at: i64,
}

impl PreviewEntry {
    pub fn expiring(preview_markup: impl Into<String>, now_millis: i64, ttl: Duration) -> Self {
        let ttl_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        Self {
            preview_markup: preview_markup.into(),
            expires_at: now_millis.saturating_add(ttl_millis),
        }
    }

    /// Usable only strictly before `expires_at`.
    pub fn is_fresh(&self, now_millis: i64) -> bool {
        now_millis < self.expires_at
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("cache read failed: {0}")]
    Read(String),
    #[error("cache write failed: {0}")]
    Write(String),
    #[error("cache contents are not valid json: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Asynchronous key -> entry store shared by every page activation.
#[async_trait::async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<PreviewEntry>, StoreError>;
    async fn set(&self, key: &str, entry: PreviewEntry) -> Result<(), StoreError>;
    async fn clear(&self) -> Result<(), StoreError>;
    /// Bytes used by all entries, counted as serialized key plus value.
    async fn size_in_use(&self) -> Result<u64, StoreError>;
}

pub(crate) fn entry_size(key: &str, entry: &PreviewEntry) -> Result<u64, StoreError> {
    let value = serde_json::to_string(entry)?;
    Ok((key.len() + value.len()) as u64)
}

/// Process-local store. Entries are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, PreviewEntry>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, PreviewEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<PreviewEntry>, StoreError> {
        Ok(self.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, entry: PreviewEntry) -> Result<(), StoreError> {
        self.lock().insert(key.to_string(), entry);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.lock().clear();
        Ok(())
    }

    async fn size_in_use(&self) -> Result<u64, StoreError> {
        self.lock()
            .iter()
            .map(|(key, entry)| entry_size(key, entry))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_serializes_with_camel_case_fields() {
        let entry = PreviewEntry::expiring("<h3>x</h3>", 1_000, Duration::from_secs(1));
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"previewMarkup":"<h3>x</h3>","expiresAt":2000}"#);
    }

    #[test]
    fn entry_expires_at_the_boundary() {
        let entry = PreviewEntry::expiring("x", 0, Duration::from_millis(10));
        assert!(entry.is_fresh(9));
        assert!(!entry.is_fresh(10));
    }
}
