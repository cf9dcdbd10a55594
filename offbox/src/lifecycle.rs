//! Install and activate.
//!
//! ```text
//! Parsed -> Installing -> Installed -> Activating -> Activated
//!               |
//!               +-> Redundant (static generation could not be opened)
//! ```
//!
//! Install precaches the manifest into the static generation, best-effort per
//! URL. Activate removes every cache that is not a current generation, claims
//! clients and runs the eviction sweep.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use futures::future::join_all;
use http::Method;
use offbox_backend::CacheStorage;
use offbox_core::{CacheEntry, FetchRequest, GenerationRole, Network, StrategyName};
use serde::Serialize;
use smol_str::SmolStr;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::host::Host;
use crate::store::CacheStore;
use crate::sweeper::{SweepReport, sweep};

/// Lifecycle state of an engine version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum LifecycleState {
    /// Loaded, no event handled yet.
    Parsed = 0,
    /// Install in progress.
    Installing = 1,
    /// Install finished.
    Installed = 2,
    /// Activate in progress.
    Activating = 3,
    /// Serving requests.
    Activated = 4,
    /// Install failed; this version will never activate.
    Redundant = 5,
}

impl LifecycleState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LifecycleState::Parsed,
            1 => LifecycleState::Installing,
            2 => LifecycleState::Installed,
            3 => LifecycleState::Activating,
            4 => LifecycleState::Activated,
            _ => LifecycleState::Redundant,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Parsed => "parsed",
            LifecycleState::Installing => "installing",
            LifecycleState::Installed => "installed",
            LifecycleState::Activating => "activating",
            LifecycleState::Activated => "activated",
            LifecycleState::Redundant => "redundant",
        };
        f.write_str(name)
    }
}

/// Atomic holder of the current [`LifecycleState`].
#[derive(Debug)]
pub struct StateCell(AtomicU8);

impl StateCell {
    fn new() -> Self {
        Self(AtomicU8::new(LifecycleState::Parsed as u8))
    }

    /// Current state.
    pub fn get(&self) -> LifecycleState {
        LifecycleState::from_u8(self.0.load(Ordering::Acquire))
    }

    fn set(&self, state: LifecycleState) {
        let previous = LifecycleState::from_u8(self.0.swap(state as u8, Ordering::AcqRel));
        debug!(from = %previous, to = %state, "lifecycle transition");
    }
}

/// Outcome of install.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    /// URLs written to the static generation.
    pub precached: Vec<SmolStr>,
    /// URLs that failed to fetch, returned non-ok, or failed to store.
    pub failed: Vec<SmolStr>,
    /// Whether the host was asked to skip waiting.
    pub skipped_waiting: bool,
}

/// Outcome of activate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivationReport {
    /// Stale caches deleted.
    pub deleted: Vec<SmolStr>,
    /// Stale caches whose deletion failed.
    pub failed: Vec<SmolStr>,
    /// Clients claimed.
    pub claimed: usize,
    /// Eviction sweep outcome.
    pub swept: SweepReport,
}

/// Runs install and activate for one engine version.
pub struct Lifecycle<S, N, H> {
    store: CacheStore<S>,
    network: Arc<N>,
    host: Arc<H>,
    config: Arc<EngineConfig>,
    state: StateCell,
}

impl<S, N, H> Lifecycle<S, N, H>
where
    S: CacheStorage,
    N: Network,
    H: Host,
{
    /// Creates the orchestrator in [`LifecycleState::Parsed`].
    pub fn new(
        store: CacheStore<S>,
        network: Arc<N>,
        host: Arc<H>,
        config: Arc<EngineConfig>,
    ) -> Self {
        Self {
            store,
            network,
            host,
            config,
            state: StateCell::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> LifecycleState {
        self.state.get()
    }

    /// Precaches the manifest and pre-opens the other generations.
    ///
    /// # Errors
    ///
    /// Fails only when the static generation cannot be opened; the version
    /// then becomes [`LifecycleState::Redundant`]. Individual precache
    /// failures are reported in [`InstallReport::failed`].
    pub async fn install(&self) -> Result<InstallReport, EngineError> {
        self.state.set(LifecycleState::Installing);
        info!(version = self.store.generations().version(), "installing");

        if let Err(error) = self.store.open(GenerationRole::Static).await {
            warn!(%error, "failed to open static generation");
            self.state.set(LifecycleState::Redundant);
            return Err(error.into());
        }

        let results = join_all(
            self.config
                .precache()
                .iter()
                .map(|uri| self.precache_one(uri)),
        )
        .await;
        let mut report = InstallReport::default();
        for (url, ok) in results {
            if ok {
                report.precached.push(url);
            } else {
                report.failed.push(url);
            }
        }

        for role in [GenerationRole::Dynamic, GenerationRole::Runtime] {
            if let Err(error) = self.store.open(role).await {
                warn!(generation = %role, %error, "failed to pre-open generation");
            }
        }

        if self.config.skip_waiting_on_install() {
            match self.host.skip_waiting().await {
                Ok(()) => report.skipped_waiting = true,
                Err(error) => warn!(%error, "skip waiting failed"),
            }
        }

        self.state.set(LifecycleState::Installed);
        info!(
            precached = report.precached.len(),
            failed = report.failed.len(),
            "install finished"
        );
        Ok(report)
    }

    async fn precache_one(&self, uri: &http::Uri) -> (SmolStr, bool) {
        let request = FetchRequest::new(Method::GET, uri.clone());
        let url = SmolStr::from(request.href());
        let response = match self.network.fetch(&request).await {
            Ok(response) if response.is_ok() => response,
            Ok(response) => {
                warn!(%url, status = %response.status(), "precache got non-ok response");
                return (url, false);
            }
            Err(error) => {
                warn!(%url, %error, "precache fetch failed");
                return (url, false);
            }
        };
        let entry = CacheEntry::stamped(response, StrategyName::CacheFirstVersioned);
        match self
            .store
            .write(GenerationRole::Static, request.key(), entry)
            .await
        {
            Ok(()) => (url, true),
            Err(error) => {
                warn!(%url, %error, "precache write failed");
                (url, false)
            }
        }
    }

    /// Deletes stale generations, claims clients and sweeps old entries.
    pub async fn activate(&self) -> ActivationReport {
        self.state.set(LifecycleState::Activating);
        info!(version = self.store.generations().version(), "activating");

        let names = self.store.cache_names().await.unwrap_or_else(|error| {
            warn!(%error, "failed to list caches");
            Vec::new()
        });
        let stale: Vec<SmolStr> = names
            .into_iter()
            .filter(|name| !self.store.generations().is_current(name))
            .collect();

        let outcomes = join_all(stale.iter().map(|name| self.store.delete_cache(name))).await;
        let mut report = ActivationReport::default();
        for (name, outcome) in stale.into_iter().zip(outcomes) {
            match outcome {
                Ok(_) => {
                    info!(cache = %name, "deleted stale generation");
                    report.deleted.push(name);
                }
                Err(error) => {
                    warn!(cache = %name, %error, "failed to delete stale generation");
                    report.failed.push(name);
                }
            }
        }

        report.claimed = self.host.claim_clients().await.unwrap_or_else(|error| {
            warn!(%error, "claiming clients failed");
            0
        });
        report.swept = sweep(&self.store, self.config.freshness().cleanup_age).await;

        self.state.set(LifecycleState::Activated);
        info!(
            deleted = report.deleted.len(),
            claimed = report.claimed,
            removed = report.swept.removed,
            "activation finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_cell_round_trips_every_state() {
        let cell = StateCell::new();
        assert_eq!(cell.get(), LifecycleState::Parsed);
        for state in [
            LifecycleState::Installing,
            LifecycleState::Installed,
            LifecycleState::Activating,
            LifecycleState::Activated,
            LifecycleState::Redundant,
        ] {
            cell.set(state);
            assert_eq!(cell.get(), state);
        }
    }
}
