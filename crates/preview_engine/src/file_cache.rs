use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use preview_logging::preview_debug;
use tokio::sync::Mutex;

use crate::cache::entry_size;
use crate::{AtomicFileWriter, CacheStore, PreviewEntry, StoreError};

const CACHE_FILENAME: &str = "preview_cache.json";

type Entries = HashMap<String, PreviewEntry>;

/// Cache persisted as a single JSON object `{url: entry}` in `dir`.
///
/// Every operation reads the file, and writes go through a temp file rename,
/// so several processes sharing `dir` see last-write-wins semantics.
#[derive(Debug)]
pub struct FileCacheStore {
    dir: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileCacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(CACHE_FILENAME)
    }

    async fn load(&self) -> Result<Entries, StoreError> {
        let path = self.path();
        blocking(move || read_entries(&path)).await
    }

    async fn store(&self, entries: Entries) -> Result<(), StoreError> {
        let writer = AtomicFileWriter::new(self.dir.clone());
        blocking(move || {
            let content = serde_json::to_vec(&entries)?;
            writer.write(CACHE_FILENAME, &content)?;
            Ok(())
        })
        .await
    }
}

async fn blocking<T, F>(f: F) -> Result<T, StoreError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|err| StoreError::Io(std::io::Error::other(err)))?
}

fn read_entries(path: &Path) -> Result<Entries, StoreError> {
    match fs::read(path) {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(Entries::new()),
        Err(err) => Err(StoreError::Read(format!("{}: {err}", path.display()))),
    }
}

#[async_trait::async_trait]
impl CacheStore for FileCacheStore {
    async fn get(&self, key: &str) -> Result<Option<PreviewEntry>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        Ok(entries.remove(key))
    }

    async fn set(&self, key: &str, entry: PreviewEntry) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), entry);
        self.store(entries).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let path = self.path();
        blocking(move || match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Write(format!("{}: {err}", path.display()))),
        })
        .await?;
        preview_debug!("cleared preview cache in {}", self.dir.display());
        Ok(())
    }

    async fn size_in_use(&self) -> Result<u64, StoreError> {
        let _guard = self.lock.lock().await;
        let entries = self.load().await?;
        entries
            .iter()
            .map(|(key, entry)| entry_size(key, entry))
            .sum()
    }
}
