//! Stored cache entries and their metadata.
//!
//! Storage primitives rarely track when something was inserted, so the engine
//! keeps its own companion metadata next to every stored response:
//!
//! - [`EntryMeta::cached_at`] - when the entry was written, `None` if unknown
//! - [`EntryMeta::strategy`] - which strategy wrote it
//!
//! Freshness checks and the eviction sweep read the metadata only; the
//! response itself is stored untouched.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::response::FetchResponse;
use crate::strategy::StrategyName;

/// Metadata stored alongside a cached response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMeta {
    /// Write time. Entries without a stamp have unknown age.
    pub cached_at: Option<DateTime<Utc>>,
    /// Strategy that wrote the entry.
    pub strategy: Option<StrategyName>,
}

impl EntryMeta {
    /// Metadata stamped with the current time.
    pub fn now(strategy: Option<StrategyName>) -> Self {
        Self {
            cached_at: Some(Utc::now()),
            strategy,
        }
    }

    /// Age at `now`.
    ///
    /// `None` when the entry carries no stamp. Stamps in the future count as
    /// age zero.
    pub fn age_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.cached_at
            .map(|cached_at| (now - cached_at).to_std().unwrap_or(Duration::ZERO))
    }
}

/// A cached response with its metadata.
///
/// ```
/// use std::time::Duration;
/// use offbox_core::{CacheEntry, FetchResponse, StrategyName};
///
/// let entry = CacheEntry::stamped(FetchResponse::ok("body"), StrategyName::CacheFirst);
/// assert!(entry.is_fresh(Duration::from_secs(60)));
///
/// let legacy = CacheEntry::unstamped(FetchResponse::ok("body"));
/// assert!(!legacy.is_fresh(Duration::from_secs(60)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    response: FetchResponse,
    meta: EntryMeta,
}

impl CacheEntry {
    /// Creates an entry from parts.
    pub fn new(response: FetchResponse, meta: EntryMeta) -> Self {
        Self { response, meta }
    }

    /// Creates an entry stamped with the current time.
    pub fn stamped(response: FetchResponse, strategy: StrategyName) -> Self {
        Self::new(response, EntryMeta::now(Some(strategy)))
    }

    /// Creates an entry without a timestamp.
    pub fn unstamped(response: FetchResponse) -> Self {
        Self::new(response, EntryMeta::default())
    }

    /// Stored response.
    #[inline]
    pub fn response(&self) -> &FetchResponse {
        &self.response
    }

    /// Entry metadata.
    #[inline]
    pub fn meta(&self) -> &EntryMeta {
        &self.meta
    }

    /// Write time, if known.
    #[inline]
    pub fn cached_at(&self) -> Option<DateTime<Utc>> {
        self.meta.cached_at
    }

    /// Age at the current time, `None` if unknown.
    pub fn age(&self) -> Option<Duration> {
        self.meta.age_at(Utc::now())
    }

    /// `true` when the entry is stamped and younger than `max_age`.
    ///
    /// Unstamped entries are never fresh.
    pub fn is_fresh(&self, max_age: Duration) -> bool {
        self.age().is_some_and(|age| age < max_age)
    }

    /// Consumes the entry, returning the response.
    pub fn into_response(self) -> FetchResponse {
        self.response
    }

    /// Approximate heap footprint of this entry.
    pub fn memory_size(&self) -> usize {
        self.response.memory_size() + std::mem::size_of::<EntryMeta>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_is_clamped_for_future_stamps() {
        let now = Utc::now();
        let meta = EntryMeta {
            cached_at: Some(now + chrono::Duration::minutes(5)),
            strategy: None,
        };
        assert_eq!(meta.age_at(now), Some(Duration::ZERO));
    }

    #[test]
    fn old_entries_are_not_fresh() {
        let meta = EntryMeta {
            cached_at: Some(Utc::now() - chrono::Duration::days(2)),
            strategy: Some(StrategyName::CacheFirstVersioned),
        };
        let entry = CacheEntry::new(FetchResponse::ok("x"), meta);
        assert!(!entry.is_fresh(Duration::from_secs(24 * 60 * 60)));
        assert!(entry.is_fresh(Duration::from_secs(7 * 24 * 60 * 60)));
    }
}
