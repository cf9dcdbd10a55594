use std::sync::Arc;

use async_trait::async_trait;
use offbox_core::{CacheEntry, EntryKey};
use smol_str::SmolStr;

use crate::{DeleteStatus, StorageError};

pub type StorageResult<T> = Result<T, StorageError>;

/// A collection of named caches.
///
/// # Missing caches
///
/// Read-only operations ([`lookup`](Self::lookup), [`keys`](Self::keys),
/// [`has`](Self::has)) on a name that was never opened must succeed as if the
/// cache were empty and must **not** create it. [`put`](Self::put) creates the
/// cache lazily.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Opens (creating if needed) the cache `name`.
    async fn open(&self, name: &str) -> StorageResult<()>;

    /// `true` if the cache `name` exists.
    async fn has(&self, name: &str) -> StorageResult<bool>;

    /// Looks up `key` in the cache `name`.
    async fn lookup(&self, name: &str, key: &EntryKey) -> StorageResult<Option<CacheEntry>>;

    /// Stores `entry` under `key` in the cache `name`, replacing any previous entry.
    async fn put(&self, name: &str, key: EntryKey, entry: CacheEntry) -> StorageResult<()>;

    /// Deletes `key` from the cache `name`.
    async fn delete(&self, name: &str, key: &EntryKey) -> StorageResult<DeleteStatus>;

    /// Keys currently stored in the cache `name`.
    async fn keys(&self, name: &str) -> StorageResult<Vec<EntryKey>>;

    /// Names of every existing cache.
    async fn cache_names(&self) -> StorageResult<Vec<SmolStr>>;

    /// Deletes the whole cache `name`. Returns `false` if it did not exist.
    async fn delete_cache(&self, name: &str) -> StorageResult<bool>;

    /// Returns the name of this storage, used in logs and metrics.
    fn label(&self) -> &str {
        "storage"
    }
}

#[async_trait]
impl<S> CacheStorage for Arc<S>
where
    S: CacheStorage + ?Sized,
{
    async fn open(&self, name: &str) -> StorageResult<()> {
        (**self).open(name).await
    }

    async fn has(&self, name: &str) -> StorageResult<bool> {
        (**self).has(name).await
    }

    async fn lookup(&self, name: &str, key: &EntryKey) -> StorageResult<Option<CacheEntry>> {
        (**self).lookup(name, key).await
    }

    async fn put(&self, name: &str, key: EntryKey, entry: CacheEntry) -> StorageResult<()> {
        (**self).put(name, key, entry).await
    }

    async fn delete(&self, name: &str, key: &EntryKey) -> StorageResult<DeleteStatus> {
        (**self).delete(name, key).await
    }

    async fn keys(&self, name: &str) -> StorageResult<Vec<EntryKey>> {
        (**self).keys(name).await
    }

    async fn cache_names(&self) -> StorageResult<Vec<SmolStr>> {
        (**self).cache_names().await
    }

    async fn delete_cache(&self, name: &str) -> StorageResult<bool> {
        (**self).delete_cache(name).await
    }

    fn label(&self) -> &str {
        (**self).label()
    }
}

#[async_trait]
impl CacheStorage for Box<dyn CacheStorage> {
    async fn open(&self, name: &str) -> StorageResult<()> {
        (**self).open(name).await
    }

    async fn has(&self, name: &str) -> StorageResult<bool> {
        (**self).has(name).await
    }

    async fn lookup(&self, name: &str, key: &EntryKey) -> StorageResult<Option<CacheEntry>> {
        (**self).lookup(name, key).await
    }

    async fn put(&self, name: &str, key: EntryKey, entry: CacheEntry) -> StorageResult<()> {
        (**self).put(name, key, entry).await
    }

    async fn delete(&self, name: &str, key: &EntryKey) -> StorageResult<DeleteStatus> {
        (**self).delete(name, key).await
    }

    async fn keys(&self, name: &str) -> StorageResult<Vec<EntryKey>> {
        (**self).keys(name).await
    }

    async fn cache_names(&self) -> StorageResult<Vec<SmolStr>> {
        (**self).cache_names().await
    }

    async fn delete_cache(&self, name: &str) -> StorageResult<bool> {
        (**self).delete_cache(name).await
    }

    fn label(&self) -> &str {
        (**self).label()
    }
}
