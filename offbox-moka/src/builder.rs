//! Builder for configuring [`MokaStorage`].

use std::sync::Arc;

use dashmap::DashMap;
use moka::future::{Cache, CacheBuilder};
use moka::policy::EvictionPolicy;
use offbox_core::{CacheEntry, EntryKey};
use smol_str::SmolStr;

use crate::storage::MokaStorage;

/// Marker type: capacity has not been configured yet.
///
/// This is the initial state of a [`MokaStorageBuilder`]. You must call either
/// [`max_entries()`](MokaStorageBuilder::max_entries) or
/// [`max_bytes()`](MokaStorageBuilder::max_bytes) before calling `build()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapacity;

/// Marker type: every named cache holds at most `n` entries.
#[derive(Debug, Clone, Copy)]
pub struct EntryCapacity(pub(crate) u64);

/// Marker type: every named cache holds at most `n` bytes (approximate).
#[derive(Debug, Clone, Copy)]
pub struct ByteCapacity(pub(crate) u64);

/// How each named cache is bounded.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Sizing {
    Entries(u64),
    Bytes(u64),
}

/// Recipe for the moka cache behind one cache name.
#[derive(Clone)]
pub(crate) struct CacheRecipe {
    sizing: Sizing,
    eviction_policy: EvictionPolicy,
}

impl std::fmt::Debug for CacheRecipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheRecipe")
            .field("sizing", &self.sizing)
            .finish()
    }
}

impl CacheRecipe {
    pub(crate) fn build(&self) -> Cache<EntryKey, CacheEntry> {
        match self.sizing {
            Sizing::Entries(capacity) => CacheBuilder::new(capacity)
                .eviction_policy(self.eviction_policy.clone())
                .build(),
            Sizing::Bytes(capacity) => CacheBuilder::new(capacity)
                .weigher(byte_weigher)
                .eviction_policy(self.eviction_policy.clone())
                .build(),
        }
    }
}

fn byte_weigher(key: &EntryKey, entry: &CacheEntry) -> u32 {
    (key.memory_size() + entry.memory_size())
        .try_into()
        .unwrap_or(u32::MAX)
}

/// Builder for creating and configuring a [`MokaStorage`].
///
/// Capacity applies to **each** named cache separately, so a storage with three
/// generations and `max_entries(1_000)` holds at most 3 000 entries.
///
/// ```
/// use offbox_moka::MokaStorage;
///
/// let storage = MokaStorage::builder()
///     .label("worker")
///     .max_entries(1_000)
///     .build();
/// ```
pub struct MokaStorageBuilder<Cap> {
    capacity: Cap,
    label: SmolStr,
    eviction_policy: Option<EvictionPolicy>,
}

impl MokaStorageBuilder<NoCapacity> {
    /// Creates a new builder with no capacity configured.
    pub fn new() -> Self {
        Self {
            capacity: NoCapacity,
            label: SmolStr::new_static("moka"),
            eviction_policy: None,
        }
    }

    /// Sets the maximum number of entries per named cache.
    pub fn max_entries(self, capacity: u64) -> MokaStorageBuilder<EntryCapacity> {
        MokaStorageBuilder {
            capacity: EntryCapacity(capacity),
            label: self.label,
            eviction_policy: self.eviction_policy,
        }
    }

    /// Sets the approximate memory budget in bytes per named cache.
    ///
    /// Weighs the URL of the key plus headers and body of the stored response.
    pub fn max_bytes(self, bytes: u64) -> MokaStorageBuilder<ByteCapacity> {
        MokaStorageBuilder {
            capacity: ByteCapacity(bytes),
            label: self.label,
            eviction_policy: self.eviction_policy,
        }
    }
}

impl Default for MokaStorageBuilder<NoCapacity> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Cap> MokaStorageBuilder<Cap> {
    /// Sets a custom label for this storage.
    ///
    /// # Default
    ///
    /// `"moka"`
    pub fn label(mut self, label: impl Into<SmolStr>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the eviction policy used once a cache is full.
    ///
    /// # Default
    ///
    /// TinyLFU for entry capacity, LRU for byte capacity.
    pub fn eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.eviction_policy = Some(policy);
        self
    }

    fn finish(self, sizing: Sizing, default_policy: fn() -> EvictionPolicy) -> MokaStorage {
        MokaStorage {
            caches: Arc::new(DashMap::new()),
            recipe: CacheRecipe {
                sizing,
                eviction_policy: self.eviction_policy.unwrap_or_else(default_policy),
            },
            label: self.label,
        }
    }
}

impl MokaStorageBuilder<EntryCapacity> {
    /// Builds the storage.
    pub fn build(self) -> MokaStorage {
        let sizing = Sizing::Entries(self.capacity.0);
        self.finish(sizing, EvictionPolicy::tiny_lfu)
    }
}

impl MokaStorageBuilder<ByteCapacity> {
    /// Builds the storage.
    pub fn build(self) -> MokaStorage {
        let sizing = Sizing::Bytes(self.capacity.0);
        self.finish(sizing, EvictionPolicy::lru)
    }
}
