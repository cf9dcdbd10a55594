//! Cache store: the engine's view over [`CacheStorage`].
//!
//! Adds generation awareness on top of the raw named-cache storage. Reads are
//! tolerant: a storage error during a lookup is logged and treated as a miss,
//! so callers on the fetch path never have to handle storage failures.

use std::sync::Arc;

use offbox_backend::{CacheStorage, DeleteStatus, StorageResult};
use offbox_core::{CacheEntry, EntryKey, GenerationNames, GenerationRole};
use smol_str::SmolStr;
use tracing::warn;

/// Generation-aware handle over a shared storage.
#[derive(Debug)]
pub struct CacheStore<S> {
    storage: Arc<S>,
    generations: GenerationNames,
}

impl<S> Clone for CacheStore<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            generations: self.generations.clone(),
        }
    }
}

impl<S> CacheStore<S> {
    /// Creates a store over `storage` for the given current generations.
    pub fn new(storage: Arc<S>, generations: GenerationNames) -> Self {
        Self {
            storage,
            generations,
        }
    }

    /// Underlying storage.
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// Current generation names.
    pub fn generations(&self) -> &GenerationNames {
        &self.generations
    }
}

impl<S> CacheStore<S>
where
    S: CacheStorage,
{

    /// Opens the current generation for `role`.
    pub async fn open(&self, role: GenerationRole) -> StorageResult<()> {
        self.storage.open(self.generations.name(role)).await
    }

    /// Looks `key` up in the current generation for `role`.
    ///
    /// Storage errors are logged and reported as a miss.
    pub async fn lookup(&self, role: GenerationRole, key: &EntryKey) -> Option<CacheEntry> {
        let name = self.generations.name(role);
        match self.storage.lookup(name, key).await {
            Ok(entry) => entry,
            Err(error) => {
                warn!(cache = name, %key, %error, "cache lookup failed, treating as miss");
                None
            }
        }
    }

    /// Looks `key` up in every current generation, in lookup order.
    pub async fn lookup_any(&self, key: &EntryKey) -> Option<(GenerationRole, CacheEntry)> {
        for role in GenerationRole::ALL {
            if let Some(entry) = self.lookup(role, key).await {
                return Some((role, entry));
            }
        }
        None
    }

    /// Writes `entry` under `key` into the current generation for `role`.
    pub async fn write(
        &self,
        role: GenerationRole,
        key: EntryKey,
        entry: CacheEntry,
    ) -> StorageResult<()> {
        self.storage
            .put(self.generations.name(role), key, entry)
            .await
    }

    /// Deletes `key` from the current generation for `role`.
    pub async fn delete(
        &self,
        role: GenerationRole,
        key: &EntryKey,
    ) -> StorageResult<DeleteStatus> {
        self.storage.delete(self.generations.name(role), key).await
    }

    /// `true` when any current generation holds an entry for `url`.
    pub async fn has_cached(&self, url: &str) -> bool {
        self.lookup_any(&EntryKey::get(url)).await.is_some()
    }

    /// Keys of the current generation for `role`.
    pub async fn keys(&self, role: GenerationRole) -> StorageResult<Vec<EntryKey>> {
        self.storage.keys(self.generations.name(role)).await
    }

    /// Names of every cache in storage, current or not.
    pub async fn cache_names(&self) -> StorageResult<Vec<SmolStr>> {
        self.storage.cache_names().await
    }

    /// Deletes the whole cache `name`.
    pub async fn delete_cache(&self, name: &str) -> StorageResult<bool> {
        self.storage.delete_cache(name).await
    }
}

#[cfg(test)]
mod tests {
    use offbox_core::{FetchResponse, StrategyName};
    use offbox_moka::MokaStorage;

    use super::*;

    fn store() -> CacheStore<MokaStorage> {
        let storage = MokaStorage::builder().max_entries(100).build();
        CacheStore::new(Arc::new(storage), GenerationNames::new("interbox", "v1.3.0"))
    }

    fn entry(body: &'static str) -> CacheEntry {
        CacheEntry::stamped(FetchResponse::ok(body), StrategyName::CacheFirst)
    }

    fn describe<S>(store: &CacheStore<S>) -> String {
        format!(
            "{} {}",
            store.generations().name(GenerationRole::Static),
            Arc::strong_count(store.storage())
        )
    }

    #[test]
    fn accessors_need_no_storage_bound() {
        struct Opaque;
        let store = CacheStore::new(
            Arc::new(Opaque),
            GenerationNames::new("interbox", "v1.3.0"),
        );

        assert_eq!(describe(&store), "interbox-static-v1.3.0 1");
    }

    #[tokio::test]
    async fn lookup_any_prefers_static_then_dynamic() {
        let store = store();
        let key = EntryKey::get("https://app.example/");
        store
            .write(GenerationRole::Runtime, key.clone(), entry("runtime"))
            .await
            .unwrap();
        store
            .write(GenerationRole::Dynamic, key.clone(), entry("dynamic"))
            .await
            .unwrap();

        let (role, found) = store.lookup_any(&key).await.unwrap();
        assert_eq!(role, GenerationRole::Dynamic);
        assert_eq!(found.response().body().as_ref(), b"dynamic");

        store
            .write(GenerationRole::Static, key.clone(), entry("static"))
            .await
            .unwrap();
        let (role, _) = store.lookup_any(&key).await.unwrap();
        assert_eq!(role, GenerationRole::Static);
    }

    #[tokio::test]
    async fn lookups_do_not_create_generations() {
        let store = store();

        assert!(!store.has_cached("https://app.example/missing").await);
        assert!(store.cache_names().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_from_one_generation_only() {
        let store = store();
        let key = EntryKey::get("https://app.example/app.js");
        store
            .write(GenerationRole::Static, key.clone(), entry("a"))
            .await
            .unwrap();
        store
            .write(GenerationRole::Runtime, key.clone(), entry("b"))
            .await
            .unwrap();

        assert_eq!(
            store.delete(GenerationRole::Static, &key).await.unwrap(),
            DeleteStatus::Deleted(1)
        );
        let (role, _) = store.lookup_any(&key).await.unwrap();
        assert_eq!(role, GenerationRole::Runtime);
    }
}
