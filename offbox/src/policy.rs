//! Freshness and retention policy.
//!
//! Two different clocks govern cached entries:
//!
//! - **max-age** per generation: how long `cache-first-versioned` serves an
//!   entry before refetching it
//! - **cleanup age**: the coarse backstop used by the eviction sweep at
//!   activation, substantially larger than any max-age

use std::time::Duration;

use offbox_core::GenerationRole;
use serde::{Deserialize, Serialize};

const HOUR: u64 = 60 * 60;
const DAY: u64 = 24 * HOUR;

/// Freshness windows and cleanup threshold.
///
/// Durations (de)serialize in humantime format (`"7days"`, `"1h"`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
pub struct FreshnessPolicy {
    /// Max-age of entries in the static generation.
    #[serde(default = "default_static_max_age", with = "humantime_serde")]
    pub static_max_age: Duration,
    /// Max-age of entries in the dynamic generation.
    #[serde(default = "default_dynamic_max_age", with = "humantime_serde")]
    pub dynamic_max_age: Duration,
    /// Max-age of entries in the runtime generation.
    #[serde(default = "default_runtime_max_age", with = "humantime_serde")]
    pub runtime_max_age: Duration,
    /// Entries older than this are removed by the eviction sweep.
    #[serde(default = "default_cleanup_age", with = "humantime_serde")]
    pub cleanup_age: Duration,
}

fn default_static_max_age() -> Duration {
    Duration::from_secs(7 * DAY)
}

fn default_dynamic_max_age() -> Duration {
    Duration::from_secs(DAY)
}

fn default_runtime_max_age() -> Duration {
    Duration::from_secs(HOUR)
}

fn default_cleanup_age() -> Duration {
    Duration::from_secs(30 * DAY)
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self {
            static_max_age: default_static_max_age(),
            dynamic_max_age: default_dynamic_max_age(),
            runtime_max_age: default_runtime_max_age(),
            cleanup_age: default_cleanup_age(),
        }
    }
}

impl FreshnessPolicy {
    /// Max-age for entries of the given generation.
    pub fn max_age(&self, role: GenerationRole) -> Duration {
        match role {
            GenerationRole::Static => self.static_max_age,
            GenerationRole::Dynamic => self.dynamic_max_age,
            GenerationRole::Runtime => self.runtime_max_age,
        }
    }

    /// `true` when the cleanup age exceeds every max-age.
    pub fn is_consistent(&self) -> bool {
        GenerationRole::ALL
            .into_iter()
            .all(|role| self.cleanup_age > self.max_age(role))
    }
}
