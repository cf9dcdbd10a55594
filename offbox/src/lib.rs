#![warn(missing_docs)]
//! # offbox
//!
//! Offline request-caching engine for installable web applications.
//!
//! The engine sits between an application and the network. For every
//! intercepted request it picks a strategy, answers from cache, network or
//! both, and keeps its caches versioned and bounded:
//!
//! - [`classifier`] maps a request to one of five strategies
//! - [`strategy`] runs the strategy against a [`CacheStore`] and a
//!   [`Network`](offbox_core::Network)
//! - [`lifecycle`] precaches on install, removes stale generations on activate
//! - [`sweeper`] drops entries past the cleanup age
//! - [`control`] and [`stats`] serve the foreground control protocol
//!
//! [`Engine`] wires all of it together behind one entry point per host event.

/// Request classification and routing rules.
pub mod classifier;

/// Engine configuration and its builder.
pub mod config;

/// Control channel messages.
pub mod control;

mod engine;

/// Error types.
///
/// - [`EngineError`] for configuration and explicit store calls
/// - [`HostError`] for host runtime calls
pub mod error;

/// Host events and outcomes.
pub mod event;

/// Host runtime trait.
pub mod host;

pub mod lifecycle;

/// Metrics collection.
///
/// With the `metrics` feature enabled, counters for routing decisions, cache
/// hits and misses, offline responses, sweep removals and offload tasks.
pub mod metrics;

pub mod notification;

/// Write-behind task execution.
pub mod offload;

/// Freshness windows and cleanup threshold.
pub mod policy;

/// Cache statistics.
pub mod stats;

/// Generation-aware store over a [`CacheStorage`](offbox_backend::CacheStorage).
pub mod store;

/// Strategy executors.
pub mod strategy;

/// Age-based eviction sweep.
pub mod sweeper;

pub use classifier::{Classifier, Matcher, Route, Rule, RuleSet};
pub use config::{EngineConfig, EngineConfigBuilder};
pub use control::ControlMessage;
pub use engine::Engine;
pub use error::{EngineError, HostError};
pub use event::{Event, EventOutcome};
pub use host::{Host, NoopHost};
pub use lifecycle::{ActivationReport, InstallReport, LifecycleState};
pub use notification::{Notification, NotificationConfig};
pub use policy::FreshnessPolicy;
pub use stats::CacheStats;
pub use store::CacheStore;
pub use sweeper::SweepReport;

pub use offbox_backend;
pub use offbox_core;
pub use offbox_core::{
    CacheEntry, Destination, EntryKey, EntryMeta, FetchRequest, FetchResponse, GenerationNames,
    GenerationRole, StrategyName,
};

/// The `offbox` prelude.
///
/// ```rust
/// use offbox::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Engine, EngineConfig, Event, EventOutcome, Host};
    pub use offbox_backend::CacheStorage;
    pub use offbox_core::{FetchRequest, FetchResponse, Network};
}
