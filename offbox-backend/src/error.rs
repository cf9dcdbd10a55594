//! Error types for storage operations.

use thiserror::Error;

/// Error type for storage operations.
///
/// The engine never surfaces these to a request: reads that fail are treated
/// as misses and failed writes are logged and dropped.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Internal storage error, state or computation error.
    #[error(transparent)]
    InternalError(Box<dyn std::error::Error + Send + Sync>),

    /// The storage could not be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The storage refused a write because it is full.
    #[error("storage quota exceeded for cache {cache}")]
    QuotaExceeded {
        /// Name of the cache that rejected the write.
        cache: String,
    },
}

impl StorageError {
    /// Wraps any error as [`StorageError::InternalError`].
    pub fn internal<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StorageError::InternalError(Box::new(error))
    }
}
