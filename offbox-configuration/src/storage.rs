//! Storage configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Storage selected by `type`.
///
/// ```yaml
/// storage:
///   type: Moka
///   max_entries: 10000
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ConfigStorage {
    /// In-memory moka storage.
    Moka(Moka),
}

/// Moka storage settings. `max_bytes` wins over `max_entries` when both are set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Moka {
    /// Maximum entries per generation.
    #[serde(default)]
    pub max_entries: Option<u64>,
    /// Maximum weighed bytes per generation.
    #[serde(default)]
    pub max_bytes: Option<u64>,
    /// Optional label used in logs.
    #[serde(default)]
    pub label: Option<String>,
}

/// Entries per generation when no capacity is configured.
pub const DEFAULT_MAX_ENTRIES: u64 = 10_000;

impl Moka {
    /// Builds the storage.
    #[cfg(feature = "moka")]
    pub fn into_storage(self) -> Result<offbox_moka::MokaStorage, ConfigError> {
        use offbox_moka::MokaStorage;

        let label = self.label.unwrap_or_else(|| "moka".to_owned());
        let storage = match self.max_bytes {
            Some(bytes) => MokaStorage::builder().max_bytes(bytes).label(label).build(),
            None => MokaStorage::builder()
                .max_entries(self.max_entries.unwrap_or(DEFAULT_MAX_ENTRIES))
                .label(label)
                .build(),
        };
        Ok(storage)
    }

    /// Builds the storage.
    #[cfg(not(feature = "moka"))]
    pub fn into_storage(self) -> Result<std::convert::Infallible, ConfigError> {
        Err(ConfigError::StorageNotAvailable("Moka".to_string()))
    }
}
