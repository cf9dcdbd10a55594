//! Metrics declaration.
//!
//! Names are registered lazily on first use and described once. Recording
//! helpers compile to nothing when the `metrics` feature is disabled.

use std::time::Duration;

use offbox_core::StrategyName;

use crate::offload::TaskKind;

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
lazy_static! {
    // Routing metrics

    /// Requests routed to a strategy.
    pub static ref ROUTED_REQUESTS: &'static str = {
        metrics::describe_counter!(
            "offbox_routed_requests_total",
            "Total number of intercepted requests routed to a strategy."
        );
        "offbox_routed_requests_total"
    };
    /// Requests served from cache.
    pub static ref CACHE_HIT_COUNTER: &'static str = {
        metrics::describe_counter!(
            "offbox_cache_hit_total",
            "Total number of responses served from cache."
        );
        "offbox_cache_hit_total"
    };
    /// Requests that missed every generation.
    pub static ref CACHE_MISS_COUNTER: &'static str = {
        metrics::describe_counter!(
            "offbox_cache_miss_total",
            "Total number of cache misses."
        );
        "offbox_cache_miss_total"
    };
    /// Synthetic offline responses.
    pub static ref OFFLINE_RESPONSES: &'static str = {
        metrics::describe_counter!(
            "offbox_offline_responses_total",
            "Total number of synthetic offline responses."
        );
        "offbox_offline_responses_total"
    };

    // Lifecycle metrics

    /// Entries removed by the eviction sweep.
    pub static ref SWEPT_ENTRIES: &'static str = {
        metrics::describe_counter!(
            "offbox_swept_entries_total",
            "Total number of entries removed by the eviction sweep."
        );
        "offbox_swept_entries_total"
    };

    // Offload manager metrics

    /// Offload tasks spawned.
    pub static ref OFFLOAD_TASKS_SPAWNED: &'static str = {
        metrics::describe_counter!(
            "offbox_offload_tasks_spawned_total",
            "Total number of offload tasks spawned."
        );
        "offbox_offload_tasks_spawned_total"
    };
    /// Offload tasks completed.
    pub static ref OFFLOAD_TASKS_COMPLETED: &'static str = {
        metrics::describe_counter!(
            "offbox_offload_tasks_completed_total",
            "Total number of offload tasks completed."
        );
        "offbox_offload_tasks_completed_total"
    };
    /// Offload tasks currently running.
    pub static ref OFFLOAD_TASKS_ACTIVE: &'static str = {
        metrics::describe_gauge!(
            "offbox_offload_tasks_active",
            "Number of currently active offload tasks."
        );
        "offbox_offload_tasks_active"
    };
    /// Offload task duration.
    pub static ref OFFLOAD_TASK_DURATION: &'static str = {
        metrics::describe_histogram!(
            "offbox_offload_task_duration_seconds",
            metrics::Unit::Seconds,
            "Duration of offload tasks in seconds."
        );
        "offbox_offload_task_duration_seconds"
    };
}

/// Records a routing decision.
#[inline]
pub fn record_route(strategy: StrategyName) {
    #[cfg(feature = "metrics")]
    metrics::counter!(*ROUTED_REQUESTS, "strategy" => strategy.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = strategy;
}

/// Records a cache hit or miss.
#[inline]
pub fn record_lookup(strategy: StrategyName, hit: bool) {
    #[cfg(feature = "metrics")]
    {
        let name = if hit { *CACHE_HIT_COUNTER } else { *CACHE_MISS_COUNTER };
        metrics::counter!(name, "strategy" => strategy.as_str()).increment(1);
    }
    #[cfg(not(feature = "metrics"))]
    let _ = (strategy, hit);
}

/// Records a synthetic offline response.
#[inline]
pub fn record_offline(strategy: StrategyName) {
    #[cfg(feature = "metrics")]
    metrics::counter!(*OFFLINE_RESPONSES, "strategy" => strategy.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = strategy;
}

/// Records entries removed by the eviction sweep.
#[inline]
pub fn record_swept(removed: u64) {
    #[cfg(feature = "metrics")]
    metrics::counter!(*SWEPT_ENTRIES).increment(removed);
    #[cfg(not(feature = "metrics"))]
    let _ = removed;
}

/// Records a spawned offload task.
#[inline]
pub fn record_offload_spawned(kind: TaskKind) {
    #[cfg(feature = "metrics")]
    {
        metrics::counter!(*OFFLOAD_TASKS_SPAWNED, "kind" => kind.as_str()).increment(1);
        metrics::gauge!(*OFFLOAD_TASKS_ACTIVE, "kind" => kind.as_str()).increment(1.0);
    }
    #[cfg(not(feature = "metrics"))]
    let _ = kind;
}

/// Records a finished offload task and how long it ran.
#[inline]
pub fn record_offload_completed(kind: TaskKind, elapsed: Duration) {
    #[cfg(feature = "metrics")]
    {
        metrics::counter!(*OFFLOAD_TASKS_COMPLETED, "kind" => kind.as_str()).increment(1);
        metrics::gauge!(*OFFLOAD_TASKS_ACTIVE, "kind" => kind.as_str()).decrement(1.0);
        metrics::histogram!(*OFFLOAD_TASK_DURATION, "kind" => kind.as_str())
            .record(elapsed.as_secs_f64());
    }
    #[cfg(not(feature = "metrics"))]
    let _ = (kind, elapsed);
}
