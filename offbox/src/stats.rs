//! Cache statistics.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use offbox_backend::CacheStorage;
use serde::Serialize;

use crate::error::EngineError;
use crate::store::CacheStore;

/// Aggregate statistics over the current generations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Entries across every generation.
    pub total_entries: u64,
    /// Sum of entry sizes in bytes.
    pub total_size: u64,
    /// Per generation name, in lookup order.
    pub per_generation: IndexMap<String, GenerationStats>,
}

/// Statistics of one generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationStats {
    /// Number of entries.
    pub entries: u64,
    /// Sum of entry sizes in bytes.
    pub size: u64,
    /// Every entry.
    pub items: Vec<CachedItem>,
}

/// One cached entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedItem {
    /// Request URL.
    pub url: String,
    /// `content-length` of the stored response, `0` when absent.
    pub size: u64,
    /// Write time, `null` when unknown.
    pub cached_at: Option<DateTime<Utc>>,
    /// Age in milliseconds, `null` when unknown.
    pub age: Option<u64>,
}

/// Walks the current generations and aggregates their entries.
///
/// Read-only: generations that do not exist count as empty and are not
/// created.
///
/// # Errors
///
/// Fails when a generation's keys cannot be listed.
pub async fn collect<S>(store: &CacheStore<S>) -> Result<CacheStats, EngineError>
where
    S: CacheStorage,
{
    let now = Utc::now();
    let mut stats = CacheStats::default();

    for (role, name) in store.generations().iter() {
        let mut generation = GenerationStats::default();
        for key in store.keys(role).await? {
            // Entries may be evicted between listing and reading.
            let Some(entry) = store.lookup(role, &key).await else {
                continue;
            };
            let size = entry.response().content_length();
            generation.entries += 1;
            generation.size += size;
            generation.items.push(CachedItem {
                url: key.url().to_owned(),
                size,
                cached_at: entry.cached_at(),
                age: entry
                    .meta()
                    .age_at(now)
                    .map(|age| u64::try_from(age.as_millis()).unwrap_or(u64::MAX)),
            });
        }
        stats.total_entries += generation.entries;
        stats.total_size += generation.size;
        stats.per_generation.insert(name.to_owned(), generation);
    }

    Ok(stats)
}
