//! Storage trait for the offbox engine.
//!
//! A [`CacheStorage`] is a set of *named* caches, each mapping an
//! [`EntryKey`](offbox_core::EntryKey) to a [`CacheEntry`](offbox_core::CacheEntry).
//! It mirrors the shape of a browser's cache storage: open a cache by name,
//! match / put / delete entries, enumerate keys, list and delete whole caches.
//!
//! Storage is assumed durable and safe for concurrent use. Conflicting writes
//! to the same key resolve as last-write-wins; no transactions are required.
// #![warn(missing_docs)]
mod error;
mod storage;

pub use error::StorageError;
pub use storage::{CacheStorage, StorageResult};

/// Status of deleting result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStatus {
    /// Record successfully deleted.
    Deleted(u32),
    /// Record already missing.
    Missing,
}

impl DeleteStatus {
    /// `true` when something was removed.
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteStatus::Deleted(_))
    }
}
