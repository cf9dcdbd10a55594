//! YAML configuration for the offbox engine.
//!
//! ```yaml
//! origin: https://app.example
//! version: v1.4.0
//! freshness:
//!   runtime_max_age: 2h
//! rules:
//!   - name: never-cache
//!     strategy: network-only
//!     match:
//!       - Url: "^https://identitytoolkit\\.googleapis\\.com"
//!   - name: documents
//!     strategy: network-first-with-fallback
//!     match:
//!       - Destination: document
//! storage:
//!   type: Moka
//!   max_entries: 5000
//! ```
//!
//! ```
//! let config = offbox_configuration::from_yaml("origin: https://app.example").unwrap();
//! let engine_config = config.into_engine_config().unwrap();
//! let dynamic = engine_config.generations().name(offbox_core::GenerationRole::Dynamic);
//! assert_eq!(dynamic, "interbox-dynamic-v1.3.0");
//! ```

#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod offload;
pub mod rule;
pub mod storage;

pub use engine::ConfigEngine;
pub use error::ConfigError;
pub use offload::{ConfigOffload, OnTimeout};
pub use rule::{ConfigMatcher, ConfigRule};
pub use storage::{ConfigStorage, Moka};

/// Parses a configuration document.
pub fn from_yaml(yaml: &str) -> Result<ConfigEngine, ConfigError> {
    serde_saphyr::from_str(yaml).map_err(|error| ConfigError::Yaml(error.to_string()))
}
