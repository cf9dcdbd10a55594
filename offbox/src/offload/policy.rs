use std::time::Duration;

/// Deadline applied to every background task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeoutPolicy {
    /// Tasks run to completion.
    #[default]
    None,
    /// Tasks still running after the duration are dropped; their write is lost.
    Cancel(Duration),
    /// Tasks run to completion and are reported when slower than the duration.
    Warn(Duration),
}

/// Settings of the [`OffloadManager`](super::OffloadManager).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OffloadConfig {
    /// Deadline for background tasks.
    pub timeout_policy: TimeoutPolicy,
}

impl OffloadConfig {
    /// Settings with the given deadline.
    pub fn new(timeout_policy: TimeoutPolicy) -> Self {
        Self { timeout_policy }
    }

    /// Drops tasks that outlive `deadline`.
    pub fn cancel_after(deadline: Duration) -> Self {
        Self::new(TimeoutPolicy::Cancel(deadline))
    }

    /// Reports tasks that outlive `threshold`.
    pub fn warn_after(threshold: Duration) -> Self {
        Self::new(TimeoutPolicy::Warn(threshold))
    }
}
