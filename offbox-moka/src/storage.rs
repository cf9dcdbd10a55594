//! Moka storage implementation.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use moka::future::Cache;
use offbox_backend::{CacheStorage, DeleteStatus, StorageResult};
use offbox_core::{CacheEntry, EntryKey};
use smol_str::SmolStr;
use tracing::debug;

use crate::builder::{CacheRecipe, MokaStorageBuilder, NoCapacity};

/// In-memory named cache storage powered by Moka.
///
/// Every cache name maps to its own Moka async cache, created on
/// [`open`](CacheStorage::open) or on the first [`put`](CacheStorage::put).
/// Clones share the same caches.
///
/// # Caveats
///
/// - Data is **not persisted**: everything is lost on process restart, so this
///   storage suits tests and native hosts that re-precache on start
/// - Once a cache is full Moka evicts entries on its own, independently of the
///   engine's age-based sweep
#[derive(Clone)]
pub struct MokaStorage {
    pub(crate) caches: Arc<DashMap<SmolStr, Cache<EntryKey, CacheEntry>>>,
    pub(crate) recipe: CacheRecipe,
    pub(crate) label: SmolStr,
}

impl std::fmt::Debug for MokaStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaStorage")
            .field("label", &self.label)
            .field("caches", &self.caches.len())
            .field("recipe", &self.recipe)
            .finish()
    }
}

impl MokaStorage {
    /// Creates a new builder for `MokaStorage`.
    pub fn builder() -> MokaStorageBuilder<NoCapacity> {
        MokaStorageBuilder::new()
    }

    /// Returns the Moka cache behind `name`, if it exists.
    ///
    /// Useful in tests to run pending maintenance tasks.
    pub fn cache(&self, name: &str) -> Option<Cache<EntryKey, CacheEntry>> {
        self.caches.get(name).map(|cache| cache.value().clone())
    }

    fn get_or_create(&self, name: &str) -> Cache<EntryKey, CacheEntry> {
        self.caches
            .entry(SmolStr::new(name))
            .or_insert_with(|| {
                debug!(storage = %self.label, cache = name, "creating cache");
                self.recipe.build()
            })
            .value()
            .clone()
    }
}

#[async_trait]
impl CacheStorage for MokaStorage {
    async fn open(&self, name: &str) -> StorageResult<()> {
        self.get_or_create(name);
        Ok(())
    }

    async fn has(&self, name: &str) -> StorageResult<bool> {
        Ok(self.caches.contains_key(name))
    }

    async fn lookup(&self, name: &str, key: &EntryKey) -> StorageResult<Option<CacheEntry>> {
        match self.cache(name) {
            Some(cache) => Ok(cache.get(key).await),
            None => Ok(None),
        }
    }

    async fn put(&self, name: &str, key: EntryKey, entry: CacheEntry) -> StorageResult<()> {
        self.get_or_create(name).insert(key, entry).await;
        Ok(())
    }

    async fn delete(&self, name: &str, key: &EntryKey) -> StorageResult<DeleteStatus> {
        let Some(cache) = self.cache(name) else {
            return Ok(DeleteStatus::Missing);
        };
        match cache.remove(key).await {
            Some(_) => Ok(DeleteStatus::Deleted(1)),
            None => Ok(DeleteStatus::Missing),
        }
    }

    async fn keys(&self, name: &str) -> StorageResult<Vec<EntryKey>> {
        Ok(self
            .cache(name)
            .map(|cache| cache.iter().map(|(key, _)| (*key).clone()).collect())
            .unwrap_or_default())
    }

    async fn cache_names(&self) -> StorageResult<Vec<SmolStr>> {
        let mut names: Vec<SmolStr> = self.caches.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        Ok(names)
    }

    async fn delete_cache(&self, name: &str) -> StorageResult<bool> {
        match self.caches.remove(name) {
            Some((_, cache)) => {
                cache.invalidate_all();
                debug!(storage = %self.label, cache = name, "deleted cache");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn label(&self) -> &str {
        &self.label
    }
}
