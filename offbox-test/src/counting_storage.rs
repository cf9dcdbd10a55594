use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use offbox_backend::{CacheStorage, DeleteStatus, StorageError, StorageResult};
use offbox_core::{CacheEntry, EntryKey};
use smol_str::SmolStr;

#[derive(Debug, Default)]
pub struct StorageCounters {
    pub lookup_count: AtomicUsize,
    pub put_count: AtomicUsize,
    pub delete_cache_count: AtomicUsize,
    /// Lookups and puts per URL.
    pub touched: DashMap<String, usize>,
}

impl StorageCounters {
    pub fn lookup_count(&self) -> usize {
        self.lookup_count.load(Ordering::SeqCst)
    }

    pub fn put_count(&self) -> usize {
        self.put_count.load(Ordering::SeqCst)
    }

    pub fn delete_cache_count(&self) -> usize {
        self.delete_cache_count.load(Ordering::SeqCst)
    }

    /// Lookups plus puts that involved `url`.
    pub fn touched(&self, url: &str) -> usize {
        self.touched.get(url).map(|count| *count).unwrap_or(0)
    }

    pub fn reset(&self) {
        self.lookup_count.store(0, Ordering::SeqCst);
        self.put_count.store(0, Ordering::SeqCst);
        self.delete_cache_count.store(0, Ordering::SeqCst);
        self.touched.clear();
    }

    fn touch(&self, key: &EntryKey) {
        *self.touched.entry(key.url().to_owned()).or_insert(0) += 1;
    }
}

/// Storage wrapper that counts calls and can be told to fail.
#[derive(Clone, Debug)]
pub struct CountingStorage<S> {
    inner: S,
    counters: Arc<StorageCounters>,
    fail_writes: Arc<AtomicBool>,
    fail_open: Arc<AtomicBool>,
    fail_lookups: Arc<AtomicBool>,
    fail_delete_cache: Arc<DashSet<String>>,
}

impl<S> CountingStorage<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            counters: Arc::new(StorageCounters::default()),
            fail_writes: Arc::new(AtomicBool::new(false)),
            fail_open: Arc::new(AtomicBool::new(false)),
            fail_lookups: Arc::new(AtomicBool::new(false)),
            fail_delete_cache: Arc::new(DashSet::new()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn counters(&self) -> &StorageCounters {
        &self.counters
    }

    /// Makes every `put` fail with [`StorageError::QuotaExceeded`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes every `open` fail with [`StorageError::Unavailable`].
    pub fn set_fail_open(&self, fail: bool) {
        self.fail_open.store(fail, Ordering::SeqCst);
    }

    /// Makes every `lookup` fail with [`StorageError::Unavailable`].
    pub fn set_fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    /// Makes `delete_cache(name)` fail with [`StorageError::Unavailable`].
    pub fn set_fail_delete_cache(&self, name: impl Into<String>) {
        self.fail_delete_cache.insert(name.into());
    }
}

#[async_trait]
impl<S> CacheStorage for CountingStorage<S>
where
    S: CacheStorage,
{
    async fn open(&self, name: &str) -> StorageResult<()> {
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("cannot open {name}")));
        }
        self.inner.open(name).await
    }

    async fn has(&self, name: &str) -> StorageResult<bool> {
        self.inner.has(name).await
    }

    async fn lookup(&self, name: &str, key: &EntryKey) -> StorageResult<Option<CacheEntry>> {
        self.counters.lookup_count.fetch_add(1, Ordering::SeqCst);
        self.counters.touch(key);
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("cannot read {name}")));
        }
        self.inner.lookup(name, key).await
    }

    async fn put(&self, name: &str, key: EntryKey, entry: CacheEntry) -> StorageResult<()> {
        self.counters.put_count.fetch_add(1, Ordering::SeqCst);
        self.counters.touch(&key);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::QuotaExceeded {
                cache: name.to_owned(),
            });
        }
        self.inner.put(name, key, entry).await
    }

    async fn delete(&self, name: &str, key: &EntryKey) -> StorageResult<DeleteStatus> {
        self.inner.delete(name, key).await
    }

    async fn keys(&self, name: &str) -> StorageResult<Vec<EntryKey>> {
        self.inner.keys(name).await
    }

    async fn cache_names(&self) -> StorageResult<Vec<SmolStr>> {
        self.inner.cache_names().await
    }

    async fn delete_cache(&self, name: &str) -> StorageResult<bool> {
        self.counters.delete_cache_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete_cache.contains(name) {
            return Err(StorageError::Unavailable(format!("cannot delete {name}")));
        }
        self.inner.delete_cache(name).await
    }

    fn label(&self) -> &str {
        "counting"
    }
}
