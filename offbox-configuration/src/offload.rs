//! Background task settings.

use std::time::Duration;

use offbox::offload::{OffloadConfig, TimeoutPolicy};
use serde::{Deserialize, Serialize};

/// What happens to a background write that outlives `timeout`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnTimeout {
    /// Abort the task.
    #[default]
    Cancel,
    /// Log a warning and let it finish.
    Warn,
}

/// ```yaml
/// offload:
///   timeout: 30s
///   on_timeout: Warn
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigOffload {
    /// Task deadline. Unbounded when absent.
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
    /// Action taken at the deadline.
    #[serde(default)]
    pub on_timeout: OnTimeout,
}

impl ConfigOffload {
    /// Converts into the engine's offload settings.
    pub fn into_offload_config(self) -> OffloadConfig {
        let policy = match (self.timeout, self.on_timeout) {
            (None, _) => TimeoutPolicy::None,
            (Some(timeout), OnTimeout::Cancel) => TimeoutPolicy::Cancel(timeout),
            (Some(timeout), OnTimeout::Warn) => TimeoutPolicy::Warn(timeout),
        };
        OffloadConfig::new(policy)
    }
}
